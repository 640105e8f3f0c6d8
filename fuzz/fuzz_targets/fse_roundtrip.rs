#![no_main]
use fse::header::Header;
use fse::{Error, FseConfig, FseDecoder, FseEncoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (Vec<u8>, u8)| {
    let (input, max_table_log) = data;
    let max_table_log = (max_table_log as u32 % 11) + 5; // 5 to 15

    let config = FseConfig::new().with_max_table_log(max_table_log);
    let encoder = match FseEncoder::new(config) {
        Ok(encoder) => encoder,
        Err(_) => return,
    };
    let packed = match encoder.compress(&input) {
        Ok(packed) => packed,
        Err(Error::DegenerateInput(_)) | Err(Error::NormalizationFailed { .. }) => return,
        Err(e) => panic!("unexpected compress error: {e}"),
    };

    let output = FseDecoder::new().decompress(&packed).unwrap();
    assert_eq!(input, output);

    // Arbitrary bytes must never panic the decoder. Zero-bit symbols make
    // any declared length decodable, so skip headers that would exhaust memory.
    if let Ok((header, _)) = Header::read(&input) {
        if header.symbol_count <= 1 << 24 {
            let _ = FseDecoder::new().decompress(&input);
        }
    }
});
