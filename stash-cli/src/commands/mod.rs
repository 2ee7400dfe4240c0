//! Command implementations for the Stash CLI.

pub mod codec;
pub mod create;
pub mod extract;
pub mod info;
pub mod list;
pub mod test;

pub use codec::{CodecKind, cmd_compress, cmd_decompress};
pub use create::cmd_create;
pub use extract::{ExtractOptions, cmd_extract};
pub use info::cmd_info;
pub use list::{ListOptions, cmd_list};
pub use test::cmd_test;
