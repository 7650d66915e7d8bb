pub mod build_log;
pub mod connector;
pub mod image;
pub mod provisioner;
pub mod runner;

pub use connector::ConnectorService;
pub use image::ImageService;
pub use provisioner::Provisioner;
pub use runner::RunnerService;
