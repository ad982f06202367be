use super::control::{ControlFrame, MAX_CONTROL_FRAME_LEN};
use super::error::FrameStreamError;
use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Data(Bytes),
    Control(ControlFrame),
}

impl Frame {
    pub fn kind(&self) -> &'static str {
        match self {
            Frame::Data(_) => "data",
            Frame::Control(control) => control.control_type.as_str(),
        }
    }
}

/// Reads the next frame.
///
/// Returns `Ok(None)` when the peer closes the connection on a frame
/// boundary; EOF inside a frame is an I/O error.
pub async fn read_frame<R>(
    reader: &mut R,
    max_frame_size: usize,
) -> Result<Option<Frame>, FrameStreamError>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    let n = reader.read(&mut len_buf).await?;
    if n == 0 {
        return Ok(None);
    }
    reader.read_exact(&mut len_buf[n..]).await?;

    let len = u32::from_be_bytes(len_buf) as usize;
    if len > 0 {
        if len > max_frame_size {
            return Err(FrameStreamError::FrameTooLarge {
                len,
                max: max_frame_size,
            });
        }
        let mut payload = BytesMut::zeroed(len);
        reader.read_exact(&mut payload).await?;
        return Ok(Some(Frame::Data(payload.freeze())));
    }

    let control_len = reader.read_u32().await? as usize;
    if control_len > MAX_CONTROL_FRAME_LEN {
        return Err(FrameStreamError::ControlFrameTooLarge(control_len));
    }
    let mut payload = vec![0u8; control_len];
    reader.read_exact(&mut payload).await?;

    ControlFrame::decode(&payload).map(|control| Some(Frame::Control(control)))
}

pub async fn write_control_frame<W>(
    writer: &mut W,
    frame: &ControlFrame,
) -> Result<(), FrameStreamError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&frame.encode()).await?;
    writer.flush().await?;
    Ok(())
}

pub async fn write_data_frame<W>(writer: &mut W, payload: &[u8]) -> Result<(), FrameStreamError>
where
    W: AsyncWrite + Unpin,
{
    // A zero length word is the control frame escape.
    if payload.is_empty() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "empty data frame",
        )
        .into());
    }
    writer.write_all(&(payload.len() as u32).to_be_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}
