//! AWS SQS FIFO queue backend.

mod client;

pub use client::SqsQueue;
