// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to implement the two commands.
//
// Module responsibilities:
// - `paths`: Derives unique remote filenames from the local paths of a
//   batch (the gist namespace is flat, so directory context is folded
//   into the name).
// - `api`: Encapsulates HTTP interactions with the gist service (create
//   gist, create authorization token).
// - `token`: Reads and writes the on-disk token file.
// - `cli`: Command definitions and handlers; glues paths -> api.
// - `logging`: Stderr tracing setup.
//
// Keeping this separation makes it possible to test the derivation and
// API logic without a terminal attached.
pub mod api;
pub mod cli;
pub mod logging;
pub mod paths;
pub mod token;
