#![no_main]
use libfuzzer_sys::fuzz_target;

use mcstructure::{StateRegistry, Structure};

fuzz_target!(|data: &[u8]| {
    let registry = StateRegistry::open();
    if let Ok(structure) = Structure::from_bytes(data, &registry) {
        // Anything that reads must write.
        let _bs = structure.to_bytes(&registry).unwrap();
    }
});
