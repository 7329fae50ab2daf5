use leetscrape_indexer_prelude::{ListingRecord, Sink};
use std::io::Write;

/// Writes one `link|name|size|seeds|leech|engine_url|desc_link|pub_date`
/// line per record.
pub struct PrintSink<W> {
    out: W,
}

impl<W: Write> PrintSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

fn format_record(record: &ListingRecord) -> String {
    let size = record
        .size_bytes()
        .map(|bytes| bytes.to_string())
        .unwrap_or_else(|| record.size.clone());
    // the separator cannot appear inside a field
    let name = record.name.replace('|', " ");
    format!(
        "{}|{}|{}|{}|{}|{}|{}|{}",
        record.link,
        name,
        size,
        record.seeds,
        record.leech,
        record.engine_url,
        record.detail_link.as_deref().unwrap_or_default(),
        record.pub_date,
    )
}

impl<W: Write> Sink for PrintSink<W> {
    fn emit(&mut self, record: ListingRecord) {
        if let Err(err) = writeln!(self.out, "{}", format_record(&record)) {
            tracing::warn!("unable to write {:?}: {err}", record.name);
        }
    }
}
