#![no_main]
use libfuzzer_sys::fuzz_target;

use mcstructure_nbt::{from_bytes, to_bytes};

fuzz_target!(|data: &[u8]| {
    if let Ok(root) = from_bytes(data) {
        let _bs = to_bytes(&root).unwrap();
    }
});
