#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() {
    if let Err(e) = ribbonshell_lib::desktop::run() {
        eprintln!("ribbonshell failed to start: {e:#}");
        std::process::exit(1);
    }
}
