pub mod swiftpesa;

pub use swiftpesa::SwiftPesaGateway;
