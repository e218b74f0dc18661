//! 输出格式。
//!
//! - 主输出：`<短歌>,<key>`（可选追加 `,<url>`）
//! - 诊断输出：同一条记录，随后每个 token 写成 `表层【拍数,品詞,細分類1,細分類2,原形】`，
//!   后续 token 写成 `表层《…》`

use std::io::{self, Write};

use tanka_core::{Match, Token};

fn annotation(token: &Token) -> String {
    format!(
        "{},{},{},{},{}",
        token.mora_count, token.pos.pos, token.pos.subclass1, token.pos.subclass2, token.pos.base_form
    )
}

pub fn write_record<W: Write>(out: &mut W, found: &Match, key: &str, url: Option<&str>) -> io::Result<()> {
    match url {
        Some(url) => writeln!(out, "{},{key},{url}", found.text()),
        None => writeln!(out, "{},{key}", found.text()),
    }
}

pub fn write_diagnostic<W: Write>(out: &mut W, found: &Match, key: &str) -> io::Result<()> {
    write_record(out, found, key, None)?;
    for token in &found.poem {
        write!(out, "{}【{}】", token.surface, annotation(token))?;
    }
    if let Some(next) = &found.trailing {
        write!(out, "{}《{}》", next.surface, annotation(next))?;
    }
    writeln!(out)
}
