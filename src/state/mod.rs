pub mod pg_store;
