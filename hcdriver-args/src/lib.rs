//! Typed hashcat option handling.
//!
//! [`SessionOptions`] carries one field per supported engine switch. The
//! [`OPTION_SCHEMA`] table binds every field to its switch name, encoding
//! kind and omission rule, and is consumed by two inverse transforms:
//!
//! - [`marshal`] turns options into the argv handed to the engine.
//! - [`parse`] rebuilds options from a serialized command line, keeping
//!   "absent" distinct from "explicitly zero".
//!
//! ```
//! use hcdriver_args::{SessionOptions, marshal, parse};
//!
//! let options = SessionOptions {
//!     hash_type: Some(0),
//!     potfile_disable: Some(true),
//!     input_file: "deadbeef".to_string(),
//!     ..SessionOptions::default()
//! };
//!
//! let args = marshal(&options).unwrap();
//! assert_eq!(args, ["--hash-type=0", "--potfile-disable", "deadbeef"]);
//! assert_eq!(parse(&args.join(" ")).unwrap(), options);
//! ```

pub mod error;
pub mod marshal;
pub mod options;
pub mod parse;
pub mod schema;

pub use error::ArgsError;
pub use marshal::{marshal, marshal_with};
pub use options::{OPTION_SCHEMA, SessionOptions};
pub use parse::{parse, parse_args, parse_with};
pub use schema::{
    FieldMut, FieldRef, OptionKind, OptionSpec, Presence, find_by_argument, find_by_field,
    option_schema, validate_schema,
};
