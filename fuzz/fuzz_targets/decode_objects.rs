#![no_main]

use libfuzzer_sys::fuzz_target;
use rpki_roa::{armor, prefix};
use rpki_roa::cert::Cert;
use rpki_roa::conf::Directives;
use rpki_roa::prefix::AddressFamily;
use rpki_roa::roa::RoaObject;

fuzz_target!(|data: &[u8]| {
    let (which, data) = match data.split_first() {
        Some((first, data)) => (*first, data),
        None => return,
    };

    match which % 5 {
        0 => { let _ = RoaObject::decode_exact(data); },
        1 => { let _ = Cert::decode(data); },
        2 => { let _ = armor::decode(data, armor::ROA_LABEL); },
        3 => { let _ = Directives::new(data).count(); },
        4 => {
            if let Ok(s) = std::str::from_utf8(data) {
                let _ = prefix::parse_ipv4_prefix(s);
                let _ = prefix::parse_ipv6_prefix(s);
                let _ = prefix::EncodedAddr::range_max(AddressFamily::Ipv6, s);
            }
        }
        _ => panic!("what?"),
    }
});
