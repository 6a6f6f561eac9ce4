//! Resume text intake: PDF upload first, pasted text as fallback.

use bytes::Bytes;
use tracing::warn;

use crate::errors::AppError;

/// Returns the text of an uploaded PDF, or `fallback_text` when there is no
/// upload or nothing could be read from it.
///
/// `pdf-extract` panics on some malformed documents, so parsing runs on the
/// blocking pool and a panicked task counts as an unreadable upload.
pub async fn text_from_upload(pdf: Option<Bytes>, fallback_text: &str) -> Result<String, AppError> {
    let fallback = || fallback_text.trim().to_string();
    let Some(bytes) = pdf.filter(|b| !b.is_empty()) else {
        return Ok(fallback());
    };

    // CPU-bound parse: spawn_blocking to avoid blocking the async executor.
    let parsed = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes)).await;

    match parsed {
        Ok(Ok(text)) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        Ok(Ok(_)) => {
            warn!("Uploaded PDF contains no extractable text, using pasted text");
            Ok(fallback())
        }
        Ok(Err(e)) => {
            warn!("Failed to read uploaded PDF, using pasted text: {e}");
            Ok(fallback())
        }
        Err(e) if e.is_panic() => {
            warn!("PDF parser panicked on uploaded file, using pasted text");
            Ok(fallback())
        }
        Err(e) => Err(AppError::Internal(anyhow::anyhow!(
            "spawn_blocking failed in PDF extraction: {e}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a one-page PDF with a correct xref table around `content`.
    fn single_page_pdf(page_extra: &str, content: &str) -> Bytes {
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R {page_extra}>>"
            ),
            format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }
        let xref_at = pdf.len();
        pdf.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
        for offset in offsets {
            pdf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        pdf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
                objects.len() + 1
            )
            .as_bytes(),
        );
        Bytes::from(pdf)
    }

    #[tokio::test]
    async fn test_no_upload_uses_fallback() {
        assert_eq!(text_from_upload(None, "  I know SQL  ").await.unwrap(), "I know SQL");
    }

    #[tokio::test]
    async fn test_empty_upload_uses_fallback() {
        let text = text_from_upload(Some(Bytes::new()), "Python").await.unwrap();
        assert_eq!(text, "Python");
    }

    #[tokio::test]
    async fn test_garbage_upload_falls_back() {
        let text = text_from_upload(Some(Bytes::from_static(b"definitely not a pdf")), "Excel")
            .await
            .unwrap();
        assert_eq!(text, "Excel");
    }

    #[tokio::test]
    async fn test_undefined_font_falls_back() {
        let content = "BT /F1 12 Tf (Hello SQL) Tj ET";

        let no_resources = single_page_pdf("", content);
        let text = text_from_upload(Some(no_resources), "pasted").await.unwrap();
        assert_eq!(text, "pasted");

        let bare_font =
            single_page_pdf("/Resources << /Font << /F1 << /Type /Font /Subtype /Type1 >> >> >> ", content);
        let text = text_from_upload(Some(bare_font), "pasted").await.unwrap();
        assert_eq!(text, "pasted");
    }
}
