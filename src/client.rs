//! Client collaborator: profile data, suspicious status and the message inbox.

/// Unique client identifier assigned by the ledger.
pub type ClientId = u32;

/// A bank client.
///
/// Name and surname are mandatory; address and passport data are optional
/// profile fields. A client missing **both** optional fields is *suspicious*
/// and is denied every refill, withdraw and transfer until at least one field
/// is filled in.
#[derive(Debug, Clone)]
pub struct Client {
    name: String,
    surname: String,
    address: Option<String>,
    passport: Option<String>,
    messages: Vec<String>,
}

impl Client {
    /// Creates a client with no address or passport data (suspicious until
    /// profile fields are filled in).
    pub fn new(name: impl Into<String>, surname: impl Into<String>) -> Self {
        Client {
            name: name.into(),
            surname: surname.into(),
            address: None,
            passport: None,
            messages: Vec::new(),
        }
    }

    /// Sets the address at construction time.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets the passport data at construction time.
    pub fn with_passport(mut self, passport: impl Into<String>) -> Self {
        self.passport = Some(passport.into());
        self
    }

    /// Updates the address after construction.
    pub fn set_address(&mut self, address: Option<String>) {
        self.address = address;
    }

    /// Updates the passport data after construction.
    pub fn set_passport(&mut self, passport: Option<String>) {
        self.passport = passport;
    }

    /// A client is suspicious iff both the address and the passport data are
    /// unset.
    pub fn is_suspicious(&self) -> bool {
        self.address.is_none() && self.passport.is_none()
    }

    /// Display name used in authorization errors and reports.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }

    /// Appends a bank notification to the inbox. No delivery guarantees and
    /// no read receipts.
    pub fn receive_notification(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }

    /// All notifications received so far, in delivery order.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}
