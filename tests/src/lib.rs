//! Pipeline level tests driven by in-process address sources and pingers.

#[cfg(test)]
mod support;

#[cfg(test)]
mod pipeline;
