// turning raw words and tracee bytes into output text
//
// every renderer writes into the call's `Printer` through `Ctx` and reports
// failure as a value: an unreadable pointer prints as its address and the
// caller carries on with the next field.

pub mod array;
pub mod flags;
pub mod primitives;
pub mod sigset;
pub mod strings;
pub mod structure;

pub use array::{print_array, print_local_array};
pub use flags::{print_flags, print_xval};
pub use primitives::{print_addr, print_fd, print_int, print_pid, print_uint};
pub use structure::{Field, FieldKind, StructView};
