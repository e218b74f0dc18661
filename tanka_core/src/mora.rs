//! 拍（mora）计数。
//!
//! 规则：平假名先按固定码位差映射到片假名，再只保留“带拍”的片假名
//! （五十音 + 促音 + 拨音 + ヴ + 长音符），剩余字符数即拍数。
//! 小写的 ァィゥェォャュョヮ 等拗音字母不单独成拍。

/// 平假名与片假名两个区块的码位差。
const KANA_OFFSET: u32 = 0x60;

/// 把 `ぁ`..=`ゔ` 映射到 `ァ`..=`ヴ`，其它字符原样返回。
fn to_katakana(ch: char) -> char {
    match ch {
        'ぁ'..='ゔ' => char::from_u32(ch as u32 + KANA_OFFSET).unwrap_or(ch),
        _ => ch,
    }
}

/// 该片假名是否单独占一拍。
fn is_mora_bearing(ch: char) -> bool {
    matches!(
        ch,
        'ア' | 'イ' | 'ウ' | 'エ' | 'オ'
            | 'カ'..='モ'
            | 'ヤ' | 'ユ' | 'ヨ'
            | 'ラ'..='ロ'
            | 'ワ' | 'ヲ' | 'ン' | 'ヴ' | 'ー'
    )
}

/// 发音串 -> 拍数。空串或不含假名时为 0。
pub fn count(pronunciation: &str) -> usize {
    pronunciation
        .chars()
        .map(to_katakana)
        .filter(|&ch| is_mora_bearing(ch))
        .count()
}
