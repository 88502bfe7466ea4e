// JustiGuide contacts - library half of the CLI crate so integration tests
// can drive the HTTP router directly.

pub mod server;
