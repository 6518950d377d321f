#![no_main]

use libfuzzer_sys::fuzz_target;
use berschema::{decode, encode, pkcs7};
use berschema::schema::Schema;

fuzz_target!(|data: &[u8]| {
    let _ = decode::decode(&Schema::Any, data);

    let schema = pkcs7::content_info();
    if let Ok(mut message) = decode::decode(&schema, data) {
        // Whatever decodes must encode again.
        assert!(encode::encode(&schema, &message).is_ok());
        if let Some(signers) = pkcs7::signer_infos(&message) {
            for signer in signers {
                let _ = pkcs7::signed_attributes_der(signer);
            }
        }
        let _ = pkcs7::detach_content(&mut message);
        assert!(encode::encode(&schema, &message).is_ok());
    }
});
