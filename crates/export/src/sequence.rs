/// Width of the zero-padded sequence id.
pub const PAD_LENGTH: usize = 3;

/// Assigns per-date sequence ids in stream order: rows repeating the
/// previous row's normalized date count up from "000", and any new date
/// resets the counter. One instance lives for exactly one batch; feeding
/// it reordered rows produces meaningless ids.
#[derive(Debug, Default)]
pub struct DaySequencer {
    last_date: Option<String>,
    count: u32,
}

impl DaySequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, date: &str) -> String {
        if self.last_date.as_deref() == Some(date) {
            self.count += 1;
        } else {
            self.count = 0;
        }
        self.last_date = Some(date.to_string());
        format!("{:0width$}", self.count, width = PAD_LENGTH)
    }
}
