use std::io;
use std::os::fd::RawFd;

use io_uring::IoUring;
use tracing::{debug, warn};

use crate::server::{RequestStatus, Server};

use super::config::WorkerConfig;
use super::conn::ConnectionPool;
use super::uring_ops::{post_accept, post_recv, post_send};
use super::user_data::{Op, unpack_user_data};

/// Run a worker event loop.
///
/// This is the io_uring reactor that feeds the request engine: it accepts
/// client connections, accumulates each request until the engine reports it
/// complete, hands the buffer to [`Server::handle_request`] and sends the
/// assembled response back. Every response declares `Connection: close`,
/// so a fully sent response tears the connection down.
///
/// The engine's scratch workspace is not re-entrant, which is why each
/// worker owns its `Server` exclusively for the lifetime of the loop.
///
/// # Arguments
/// * `listen_fd` - file descriptor of the listening socket (`SO_REUSEPORT`)
/// * `server` - this worker's request engine instance
/// * `config` - worker configuration
pub fn run_worker(listen_fd: RawFd, server: &mut Server<'_>, config: &WorkerConfig) -> io::Result<()> {
    let mut ring = IoUring::new(config.ring_size)?;
    let mut pool = ConnectionPool::new(
        config.pool_capacity,
        config.request_buffer_capacity,
        config.response_buffer_capacity,
    );

    // Prime the accept pipeline
    for _ in 0..config.initial_accepts {
        let id = pool.alloc();
        pool.ensure_slot(id, -1);
        post_accept(&mut ring, listen_fd, id);
    }

    loop {
        ring.submit_and_wait(1)?;

        // Drain all completed events
        let mut events = Vec::new();
        {
            let mut cq = ring.completion();
            while let Some(cqe) = cq.next() {
                events.push((cqe.user_data(), cqe.result()));
            }
        }

        for (tag, res) in events {
            let (id, op) = unpack_user_data(tag);
            match op {
                Some(Op::Accept) => handle_accept(&mut ring, &mut pool, id, res, listen_fd),
                Some(Op::Recv) => handle_recv(&mut ring, &mut pool, server, id, res),
                Some(Op::Send) => handle_send(&mut ring, &mut pool, id, res),
                None => {
                    warn!(tag, "completion with unknown opcode, dropping");
                }
            }
        }
    }
}

fn handle_accept(
    ring: &mut IoUring,
    pool: &mut ConnectionPool,
    id: usize,
    res: i32,
    listen_fd: RawFd,
) {
    if res < 0 {
        // Accept failed, re-arm on the same slot
        debug!(id, res, "accept failed, re-arming");
        post_accept(ring, listen_fd, id);
        return;
    }

    // Accept succeeded - arm the connection and start reading the request
    if let Some(conn) = pool.get_mut(id) {
        conn.begin_request(res);
        post_recv(ring, conn);
    }

    // Keep the accept pipeline full - allocate a new slot
    let next = pool.alloc();
    pool.ensure_slot(next, -1);
    post_accept(ring, listen_fd, next);
}

fn handle_recv(
    ring: &mut IoUring,
    pool: &mut ConnectionPool,
    server: &mut Server<'_>,
    id: usize,
    res: i32,
) {
    if res <= 0 {
        // Peer went away (or recv failed) before the request completed
        pool.teardown(id);
        return;
    }

    let Some(conn) = pool.get_mut(id) else {
        return;
    };
    conn.request.wrote(res as usize);

    match server.check_request_complete(conn.request.window()) {
        RequestStatus::NeedMore if conn.request.is_full() => {
            warn!(id, "request exceeds the receive buffer, dropping connection");
            pool.teardown(id);
        }
        RequestStatus::NeedMore => {
            post_recv(ring, conn);
        }
        RequestStatus::Complete => {
            let (outcome, len) = server.handle_request(conn.request.window(), &mut conn.response);
            debug!(id, ?outcome, len, "request handled");
            conn.response_len = len;
            conn.response_sent = 0;
            post_send(ring, conn);
        }
    }
}

fn handle_send(ring: &mut IoUring, pool: &mut ConnectionPool, id: usize, res: i32) {
    if res < 0 {
        pool.teardown(id);
        return;
    }

    let Some(conn) = pool.get_mut(id) else {
        return;
    };
    conn.response_sent += res as usize;

    if conn.response_sent < conn.response_len {
        // Partial send - continue sending
        post_send(ring, conn);
    } else {
        // Response fully sent; every response is Connection: close
        pool.teardown(id);
    }
}
