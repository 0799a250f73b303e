use std::os::fd::RawFd;
use std::ptr;

use io_uring::{IoUring, opcode, types};

use super::conn::Connection;
use super::user_data::{Op, pack_user_data};

/// io_uring SQE submission helpers
///
/// These functions push operations onto the submission queue with the
/// (connection id, op) tag packed into user_data.

/// Post an accept operation for a new client connection
pub fn post_accept(ring: &mut IoUring, listen_fd: RawFd, conn_id: usize) {
    let sqe = opcode::Accept::new(types::Fd(listen_fd), ptr::null_mut(), ptr::null_mut())
        .build()
        .user_data(pack_user_data(conn_id, Op::Accept));
    unsafe {
        ring.submission().push(&sqe).expect("SQ full (accept)");
    }
}

/// Post a recv into the free tail of the connection's request buffer
pub fn post_recv(ring: &mut IoUring, conn: &mut Connection) {
    let (ptr, len) = conn.request.write_ptr_len();
    let sqe = opcode::Recv::new(types::Fd(conn.fd), ptr, len as u32)
        .build()
        .user_data(pack_user_data(conn.id, Op::Recv));
    unsafe {
        ring.submission().push(&sqe).expect("SQ full (recv)");
    }
}

/// Post a send of the unsent remainder of the connection's response
pub fn post_send(ring: &mut IoUring, conn: &mut Connection) {
    let ptr = unsafe { conn.response.as_ptr().add(conn.response_sent) };
    let len = (conn.response_len - conn.response_sent) as u32;
    let sqe = opcode::Send::new(types::Fd(conn.fd), ptr, len)
        .build()
        .user_data(pack_user_data(conn.id, Op::Send));
    unsafe {
        ring.submission().push(&sqe).expect("SQ full (send)");
    }
}
