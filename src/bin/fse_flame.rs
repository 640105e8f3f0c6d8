use fse::{FseDecoder, FseEncoder};

fn main() {
    let input = b"It was the best of times, it was the worst of times. "
        .iter()
        .cycle()
        .take(256 * 1024)
        .copied()
        .collect::<Vec<_>>();
    let encoder = FseEncoder::default();
    let decoder = FseDecoder::new();

    for _ in 0..200 {
        let packed = encoder.compress(&input).unwrap();
        let output = decoder.decompress(&packed).unwrap();
        assert_eq!(output.len(), input.len());
    }
}
