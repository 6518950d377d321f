#![no_main]

use libfuzzer_sys::fuzz_target;
use berschema::decode;
use berschema::schema::Schema;

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = decode::decode(&Schema::Oid, data) {
        if let Some(oid) = value.as_oid() {
            let _ = oid.to_string();
        }
    }
});
