pub mod events;
pub mod firehose;
pub mod init;
