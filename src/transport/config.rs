use crate::constants;

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Number of initial accept operations to prime the pipeline
    pub initial_accepts: usize,
    /// Size of the io_uring submission/completion queue
    pub ring_size: u32,
    /// Capacity of the per-connection request accumulation buffer
    pub request_buffer_capacity: usize,
    /// Capacity of the per-connection response buffer
    pub response_buffer_capacity: usize,
    /// Initial capacity for the connection pool
    pub pool_capacity: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            initial_accepts: constants::INITIAL_ACCEPTS_PER_WORKER,
            ring_size: 512,
            request_buffer_capacity: constants::REQUEST_BUFFER_CAPACITY,
            response_buffer_capacity: constants::RESPONSE_BUFFER_CAPACITY,
            pool_capacity: 4096,
        }
    }
}
