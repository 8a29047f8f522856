use copy_folder_content::encoding::{decode, DecodedText, Detection};
use copy_folder_content::FileRef;
use encoding_rs::{SHIFT_JIS, UTF_8, WINDOWS_1252};

#[test]
fn test_valid_utf8_is_returned_verbatim() {
    let samples = [
        "",
        "plain ascii\n",
        "naïve café – “quotes” and emoji 🦀\n",
        "日本語のテキストです。\n",
    ];
    for sample in samples {
        let (text, encoding) = decode(sample.as_bytes());
        assert_eq!(text, sample);
        assert_eq!(encoding, UTF_8);
    }
}

#[test]
fn test_decoding_never_fails_on_arbitrary_bytes() {
    let buffers: Vec<Vec<u8>> = vec![
        vec![0xff, 0xfe, 0xfd],
        vec![0xc3],
        (0u8..=255).collect(),
        vec![0x80; 64],
    ];
    for buffer in buffers {
        let (text, _) = decode(&buffer);
        assert!(!text.is_empty());
    }
}

#[test]
fn test_confident_legacy_detection_selects_codec() {
    let detection = Detection {
        charset: "windows-1252".to_string(),
        confidence: 0.73,
    };
    assert_eq!(detection.codec(), Some(WINDOWS_1252));

    let detection = Detection {
        charset: "SHIFT_JIS".to_string(),
        confidence: 0.99,
    };
    assert_eq!(detection.codec(), Some(SHIFT_JIS));
}

#[test]
fn test_low_confidence_or_utf8_detection_keeps_utf8() {
    let at_threshold = Detection {
        charset: "windows-1252".to_string(),
        confidence: 0.5,
    };
    assert_eq!(at_threshold.codec(), None);

    for charset in ["utf-8", "UTF-8", "ascii"] {
        let detection = Detection {
            charset: charset.to_string(),
            confidence: 1.0,
        };
        assert!(detection.is_utf8_or_ascii());
        assert_eq!(detection.codec(), None);
    }
}

#[test]
fn test_decoded_text_keeps_its_source() {
    let source = FileRef::new("/ws/readme.txt");
    let decoded = DecodedText::from_bytes(source.clone(), b"hello\n");
    assert_eq!(decoded.source, source);
    assert_eq!(decoded.text, "hello\n");
    assert_eq!(decoded.encoding, "UTF-8");
}

#[test]
fn test_detects_legacy_encoded_files() {
    let japanese = "日本語のテキストです。このファイルはシフトJISで保存されています。\n\
                    文字化けせずに読み込めることを確認します。\n";
    let (bytes, _, _) = SHIFT_JIS.encode(japanese);
    let (text, encoding) = decode(&bytes);
    assert_eq!(encoding, SHIFT_JIS);
    assert_eq!(text, japanese);

    let french = "Le garçon a mangé une crème brûlée près de la fenêtre. \
                  Où est passé le château à côté de l'église?\n";
    let (bytes, _, _) = WINDOWS_1252.encode(french);
    let (text, encoding) = decode(&bytes);
    assert_eq!(encoding, WINDOWS_1252);
    assert_eq!(text, french);
}
