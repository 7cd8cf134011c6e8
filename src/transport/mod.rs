mod serial;
mod supervisor;
mod tcp;
mod transport;

pub use serial::SerialTransport;
pub use supervisor::ConnectionState;
pub use supervisor::OpenError;
pub use supervisor::ReconnectPolicy;
pub use supervisor::Supervised;
pub use supervisor::Supervisor;
pub use tcp::TcpTransport;
pub use tcp::DEFAULT_HOST;
pub use tcp::DEFAULT_PORT;
pub use transport::ReadError;
pub use transport::Transport;


#[cfg(test)]
mod test_supervisor;
