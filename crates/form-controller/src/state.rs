use form_spec::SpecError;

/// Current position within a form. `1 <= current_page <= total_pages` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormState {
    current_page: usize,
    total_pages: usize,
}

impl FormState {
    pub fn new(total_pages: usize) -> Result<Self, SpecError> {
        if total_pages == 0 {
            return Err(SpecError::PageOutOfRange {
                page: 1,
                total: 0,
            });
        }
        Ok(Self {
            current_page: 1,
            total_pages,
        })
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn is_first(&self) -> bool {
        self.current_page == 1
    }

    pub fn is_last(&self) -> bool {
        self.current_page == self.total_pages
    }

    /// Jump to `page`, leaving the state untouched when out of range.
    pub fn go_to(&mut self, page: usize) -> Result<(), SpecError> {
        if page == 0 || page > self.total_pages {
            return Err(SpecError::PageOutOfRange {
                page,
                total: self.total_pages,
            });
        }
        self.current_page = page;
        Ok(())
    }

    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current_page += 1;
        true
    }

    pub fn retreat(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.current_page -= 1;
        true
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_pages_is_rejected() {
        assert!(FormState::new(0).is_err());
    }

    #[test]
    fn advance_stops_at_last_page() {
        let mut state = FormState::new(2).unwrap();
        assert!(state.advance());
        assert!(!state.advance());
        assert_eq!(state.current_page(), 2);
    }

    #[test]
    fn retreat_stops_at_first_page() {
        let mut state = FormState::new(4).unwrap();
        assert!(!state.retreat());
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn go_to_rejects_out_of_range_without_moving() {
        let mut state = FormState::new(7).unwrap();
        state.go_to(5).unwrap();
        assert!(state.go_to(8).is_err());
        assert!(state.go_to(0).is_err());
        assert_eq!(state.current_page(), 5);
        state.reset();
        assert_eq!(state.current_page(), 1);
    }
}
