pub mod sanitizer;
pub mod threat_intel;
