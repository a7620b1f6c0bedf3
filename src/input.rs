//! Line-oriented domain source.

use std::io;

use futures::stream::{self, Stream};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Split};

/// Lazily yields one domain per input line until end of stream.
///
/// Lines are trimmed but blank lines are kept: they become empty domains and
/// still produce a report row. Bytes that are not UTF-8 are replaced with
/// U+FFFD, so a bad line still gets its (all-false) row. An I/O error is
/// yielded once and ends the stream.
pub fn domain_lines<R>(reader: R) -> impl Stream<Item = io::Result<String>>
where
    R: AsyncBufRead + Unpin,
{
    stream::unfold(Some(reader.split(b'\n')), next_domain)
}

async fn next_domain<R>(
    lines: Option<Split<R>>,
) -> Option<(io::Result<String>, Option<Split<R>>)>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = lines?;
    match lines.next_segment().await {
        Ok(Some(bytes)) => {
            let line = String::from_utf8_lossy(&bytes).trim().to_string();
            Some((Ok(line), Some(lines)))
        }
        Ok(None) => None,
        Err(err) => Some((Err(err), None)),
    }
}

#[cfg(test)]
mod tests {
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use futures::StreamExt;
    use tokio::io::{AsyncRead, BufReader, ReadBuf};

    use super::domain_lines;

    async fn collect(input: &'static [u8]) -> Vec<String> {
        domain_lines(input)
            .map(|line| line.expect("in-memory read succeeds"))
            .collect()
            .await
    }

    #[tokio::test]
    async fn yields_trimmed_lines_in_order() {
        let domains = collect(b"example.com\r\n  example.org \nexample.net").await;
        assert_eq!(domains, vec!["example.com", "example.org", "example.net"]);
    }

    #[tokio::test]
    async fn keeps_blank_lines_as_empty_domains() {
        let domains = collect(b"a.example\n\nb.example\n").await;
        assert_eq!(domains, vec!["a.example", "", "b.example"]);
    }

    #[tokio::test]
    async fn empty_input_yields_nothing() {
        assert!(collect(b"").await.is_empty());
    }

    #[tokio::test]
    async fn invalid_utf8_is_replaced_not_fatal() {
        let domains = collect(b"ok.example\n\xffbad.example\r\nlater.example\n").await;
        assert_eq!(
            domains,
            vec!["ok.example", "\u{FFFD}bad.example", "later.example"]
        );
    }

    /// Serves `data` then fails every subsequent read.
    struct BrokenReader {
        data: &'static [u8],
    }

    impl AsyncRead for BrokenReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<std::io::Result<()>> {
            if self.data.is_empty() {
                return Poll::Ready(Err(std::io::Error::other("device gone")));
            }
            let n = self.data.len().min(buf.remaining());
            buf.put_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn stream_ends_after_read_error() {
        let reader = BufReader::new(BrokenReader {
            data: b"one.example\n",
        });
        let results: Vec<_> = domain_lines(reader).collect().await;
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }
}
