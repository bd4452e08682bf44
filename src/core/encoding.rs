use chardetng::EncodingDetector;
use encoding_rs::{Encoding, BIG5, GB18030, GBK, UTF_16LE, UTF_8};

/// Bytes fed to the statistical detector.
const SAMPLE_SIZE: usize = 100_000;

/// Encodings tried after the detected one, in order.
const FALLBACK_ENCODINGS: [&Encoding; 4] = [UTF_8, GB18030, UTF_16LE, BIG5];

/// Guess the text encoding of `bytes`: BOM first, then statistical detection.
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    let sample = &bytes[..bytes.len().min(SAMPLE_SIZE)];
    let mut detector = EncodingDetector::new();
    detector.feed(sample, sample.len() == bytes.len());
    let guessed = detector.guess(None, true);

    // GBK 一律放寬為 GB18030
    if guessed == GBK {
        GB18030
    } else {
        guessed
    }
}

/// Decode `bytes` to text, returning the encoding that was used.
///
/// The detected encoding is tried first, then the fallback list; the first
/// one that decodes without malformed sequences wins. When none does, the
/// detected encoding is used with replacement characters.
pub fn decode_text(bytes: &[u8]) -> (String, &'static Encoding) {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        if had_errors {
            tracing::warn!("Malformed {} sequences replaced", encoding.name());
        }
        return (text.into_owned(), encoding);
    }

    let detected = detect_encoding(bytes);
    tracing::debug!("Detected encoding: {}", detected.name());

    let mut candidates: Vec<&'static Encoding> = vec![detected];
    for encoding in FALLBACK_ENCODINGS {
        if !candidates.contains(&encoding) {
            candidates.push(encoding);
        }
    }

    for encoding in candidates {
        let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
        if !had_errors {
            if encoding != detected {
                tracing::info!("Fell back to encoding {}", encoding.name());
            }
            return (text.into_owned(), encoding);
        }
    }

    tracing::warn!(
        "No clean decoding found, using {} with replacement characters",
        detected.name()
    );
    let (text, _) = detected.decode_without_bom_handling(bytes);
    (text.into_owned(), detected)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GBK_SAMPLE: &str = "姓名,电话,部门,入职日期\n\
        张三,13800000001,销售部,2021年3月1日\n\
        李四,13800000002,财务部,2020年7月15日\n\
        王五,13800000003,人事部,2019年11月20日\n\
        赵六,13800000004,技术部,2022年1月5日\n\
        陈楠,13800000005,市场部,2018年9月9日\n\
        刘洋,13800000006,客户服务中心,2017年6月30日\n\
        周杰,13800000007,行政管理部,2016年4月18日\n\
        吴敏,13800000008,研究开发中心,2015年8月8日\n";

    #[test]
    fn test_utf8_without_bom() {
        let (text, encoding) = decode_text("姓名,电话\n张三,138\n".as_bytes());
        assert_eq!(encoding, UTF_8);
        assert_eq!(text, "姓名,电话\n张三,138\n");
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("name\nzhang\n".as_bytes());
        let (text, encoding) = decode_text(&bytes);
        assert_eq!(encoding, UTF_8);
        assert_eq!(text, "name\nzhang\n");
    }

    #[test]
    fn test_utf16le_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "姓名\n张三\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let (text, encoding) = decode_text(&bytes);
        assert_eq!(encoding, UTF_16LE);
        assert_eq!(text, "姓名\n张三\n");
    }

    #[test]
    fn test_gbk_text_is_decoded() {
        let (bytes, _, _) = GBK.encode(GBK_SAMPLE);
        let (text, encoding) = decode_text(&bytes);
        assert_eq!(encoding, GB18030);
        assert_eq!(text, GBK_SAMPLE);
    }
}
