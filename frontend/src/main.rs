//! Entry point for the WASM application

pub fn main() {
    waterseg_frontend::mount();
}
