//! Built-in connectors shipped with the runner.
//!
//! | connector    | operation       | provider  |
//! |--------------|-----------------|-----------|
//! | `core.case`  | `create`        | in-process |
//! | `ir.sms`     | `send`          | Kavenegar |
//! | `ir.payment` | `createInvoice` | Zarinpal  |

pub mod case;
pub mod payment;
pub mod sms;

pub use case::CreateCase;
pub use payment::CreateInvoice;
pub use sms::SendSms;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::Value;

    use crate::http::{HttpResponse, HttpTransport};
    use crate::ConnectorError;

    /// A request the fake transport saw.
    #[derive(Debug, Clone, PartialEq)]
    pub enum Sent {
        Json { url: String, body: Value },
        Form { url: String, form: Vec<(String, String)> },
    }

    /// Answers every POST with the same canned response.
    pub struct CannedTransport {
        pub response: HttpResponse,
        pub sent: Mutex<Vec<Sent>>,
    }

    impl CannedTransport {
        pub fn new(status: u16, body: Value) -> Self {
            Self {
                response: HttpResponse { status, body },
                sent: Mutex::new(Vec::new()),
            }
        }

        pub fn sent(&self) -> Vec<Sent> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpTransport for CannedTransport {
        async fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse, ConnectorError> {
            self.sent.lock().unwrap().push(Sent::Json {
                url: url.to_owned(),
                body: body.clone(),
            });
            Ok(self.response.clone())
        }

        async fn post_form(
            &self,
            url: &str,
            form: &[(String, String)],
        ) -> Result<HttpResponse, ConnectorError> {
            self.sent.lock().unwrap().push(Sent::Form {
                url: url.to_owned(),
                form: form.to_vec(),
            });
            Ok(self.response.clone())
        }
    }
}
