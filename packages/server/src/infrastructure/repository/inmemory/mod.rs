pub mod session;

pub use session::InMemorySessionRepository;
