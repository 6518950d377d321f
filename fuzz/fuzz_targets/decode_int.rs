#![no_main]

use libfuzzer_sys::fuzz_target;
use berschema::Mode;
use berschema::decode::{DecodeConfig, Decoder};
use berschema::schema::Schema;

fuzz_target!(|data: &[u8]| {
    for mode in [Mode::Ber, Mode::Der] {
        let decoder = Decoder::new(DecodeConfig::default().with_mode(mode));
        if let Ok(value) = decoder.decode(&Schema::Integer, data) {
            if let Some(int) = value.as_integer() {
                let _ = int.to_i64();
                let _ = int.to_u64();
                let _ = int.to_i128();
                let _ = int.to_string();
            }
        }
    }
});
