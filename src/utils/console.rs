use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use crate::core::library::{LibraryError, LibraryResult};

// read one line with surrounding whitespace removed; end of input is an error
pub async fn read_line<R>(reader: &mut R) -> LibraryResult<String>
    where R: AsyncBufRead + Unpin {
    let mut line = String::new();
    let size = reader.read_line(&mut line).await?;
    if size == 0 {
        return Err(LibraryError::runtime("input stream closed", Some("EOF".to_string())));
    }
    Ok(line.trim().to_string())
}

pub async fn write_line<W>(writer: &mut W, text: &str) -> LibraryResult<()>
    where W: AsyncWrite + Unpin {
    writer.write_all(text.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

// write the label without a newline and read the answer on the same line
pub async fn prompt<R, W>(reader: &mut R, writer: &mut W, label: &str) -> LibraryResult<String>
    where R: AsyncBufRead + Unpin, W: AsyncWrite + Unpin {
    writer.write_all(label.as_bytes()).await?;
    writer.flush().await?;
    read_line(reader).await
}

#[cfg(test)]
mod tests {
    use crate::core::library::LibraryError;
    use crate::utils::console::{prompt, read_line, write_line};

    #[tokio::test]
    async fn test_should_read_trimmed_lines() {
        let mut reader: &[u8] = b"  Dune  \n\nlast";
        assert_eq!("Dune", read_line(&mut reader).await.expect("should read line"));
        assert_eq!("", read_line(&mut reader).await.expect("should read line"));
        assert_eq!("last", read_line(&mut reader).await.expect("should read line"));
        let res = read_line(&mut reader).await;
        assert!(matches!(res, Err(LibraryError::Runtime { .. })));
    }

    #[tokio::test]
    async fn test_should_prompt_and_write() {
        let mut reader: &[u8] = b"111\n";
        let mut writer: Vec<u8> = vec![];
        let answer = prompt(&mut reader, &mut writer, "Enter ISBN: ").await.expect("should prompt");
        write_line(&mut writer, "done").await.expect("should write");
        assert_eq!("111", answer);
        assert_eq!("Enter ISBN: done\n", String::from_utf8(writer).expect("should be utf8"));
    }
}
