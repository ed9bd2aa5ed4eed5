// Application layer: wires file-backed adapters to the core for the CLI.

pub mod commands;
