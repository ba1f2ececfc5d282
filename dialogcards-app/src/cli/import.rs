use anyhow::Result;
use dialogcards_core::Dialog;
use std::io::Read;

/// Reads `front,back[,tip]` rows; the first line is a header.
pub fn read_dialogs<R: Read>(input: R) -> Result<Vec<Dialog>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let mut dialogs = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let front = rec.get(0).unwrap_or("").trim();
        let back = rec.get(1).unwrap_or("").trim();
        let tip = rec.get(2).map(str::trim).filter(|s| !s.is_empty());

        let mut d = Dialog::new(front, back);
        if let Some(t) = tip {
            d = d.with_tip(t);
        }
        dialogs.push(d);
    }
    Ok(dialogs)
}
