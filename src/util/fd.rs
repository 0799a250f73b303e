use std::{io, os::fd::RawFd};

use tracing::warn;

pub fn close_fd_quiet(fd: RawFd) {
    // After this call, consider fd dead in all code paths.
    let ret = unsafe { libc::close(fd) };
    if ret != 0 {
        let err = io::Error::last_os_error();
        match err.raw_os_error() {
            Some(libc::EBADF) => {
                warn!(fd, "close -> EBADF (double close / invalid fd)");
            }
            Some(libc::EINTR) => {
                warn!(fd, "close interrupted by signal (EINTR); not retrying");
            }
            _ => {
                warn!(fd, %err, "close failed");
            }
        }
    }
}
