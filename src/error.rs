use thiserror::Error;

/// Errors returned when claiming a queue endpoint.
///
/// Full and empty queues are not errors; `enqueue` and `dequeue` report them
/// as `false` and `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpscError {
    #[error("queue already has a live producer handle")]
    ProducerClaimed,

    #[error("queue already has a live consumer handle")]
    ConsumerClaimed,
}
