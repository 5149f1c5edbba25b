pub mod admins;
pub mod users;
pub mod wish_records;
pub mod wishes;

pub use admins as admin_entity;
pub use users as user_entity;
pub use wish_records as wish_record_entity;
pub use wishes as wish_entity;

pub use wish_records::RecordStatus;
pub use wishes::Gender;
