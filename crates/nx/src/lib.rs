//! Command line front end for the `nx_sarc` and `nx_mcpk` libraries.

pub mod commands;
