pub mod server;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        dsn: String,
        notify_poll_interval: u64,
    },
}
