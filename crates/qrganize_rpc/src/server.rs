//! Line-delimited JSON-RPC loop: one request per input line, one response
//! per output line.

use crate::dispatch::dispatch_line;
use crate::service::StoreService;
use log::info;
use qrganize_core::StorageApi;
use std::io::{self, BufRead, Write};

/// Serves requests from `input` until EOF. Blank lines are skipped.
///
/// Returns the number of requests answered.
pub fn serve<M, I, O>(service: &mut StoreService<M>, input: I, mut output: O) -> io::Result<u64>
where
    M: StorageApi,
    I: BufRead,
    O: Write,
{
    let mut answered = 0u64;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = dispatch_line(service, &line);
        serde_json::to_writer(&mut output, &response)?;
        output.write_all(b"\n")?;
        output.flush()?;
        answered += 1;
    }

    info!("event=serve_end module=rpc status=ok answered={answered}");
    Ok(answered)
}
