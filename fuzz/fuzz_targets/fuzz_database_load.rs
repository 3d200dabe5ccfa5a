#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Garbage input must fail cleanly, never panic
    if let Ok(db) = geoip_dat::Database::from_bytes(data.to_vec()) {
        let _ = db.info();
        let _ = db.validate();
    }
});
