#![no_main]
use libfuzzer_sys::fuzz_target;

// First four bytes pick the address, the rest is the database image
fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let ipnum = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
    let Ok(db) = geoip_dat::Database::from_bytes(data[4..].to_vec()) else {
        return;
    };

    if let Ok(record) = db.look_up_num(ipnum) {
        let _ = record.to_json();
    }
    let _ = db.network_of(&geoip_dat::num_to_addr(ipnum));

    if let Ok(text) = std::str::from_utf8(&data[4..data.len().min(24)]) {
        let _ = geoip_dat::addr_to_num(text);
        let _ = db.look_up(text);
    }
});
