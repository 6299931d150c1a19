// Use cases module - each CLI command has a corresponding use case.
pub mod configfile;
pub mod delete_file;
pub mod download_file;
pub mod upload_file;

pub use configfile::ConfigfileUseCase;
pub use delete_file::DeleteFileUseCase;
pub use download_file::DownloadFileUseCase;
pub use upload_file::UploadFileUseCase;
