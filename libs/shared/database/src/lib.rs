pub mod supabase;

pub use supabase::{representation_headers, SupabaseClient};
