pub mod allowed_extensions;
pub mod owner_id;
pub mod stored_file_name;

pub use allowed_extensions::AllowedExtensions;
pub use owner_id::OwnerId;
pub use stored_file_name::StoredFileName;
