pub mod all_students;
pub mod import_export;
pub mod index;
pub mod sse;
pub mod students;
