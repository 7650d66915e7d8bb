use crate::{CloudConnector, Runner, VmImage};

/// Entities that can be matched by the free-text list search.
pub trait Searchable {
    /// Fields scanned by [`Searchable::matches_term`].
    fn search_fields(&self) -> Vec<&str>;

    /// Case-insensitive substring match on any search field. A blank term
    /// matches everything; any other term is matched as typed, surrounding
    /// whitespace included.
    fn matches_term(&self, term: &str) -> bool {
        if term.trim().is_empty() {
            return true;
        }
        let term = term.to_lowercase();
        self.search_fields()
            .into_iter()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

impl Searchable for CloudConnector {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.region.as_str(),
            self.service_type.as_str(),
        ]
    }
}

impl Searchable for VmImage {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.name.as_str(),
            self.machine.name.as_str(),
            self.machine.identifier.as_str(),
            self.description.as_str(),
        ];
        if let Some(connector) = &self.cloud_connector {
            fields.push(connector.name.as_str());
        }
        fields
    }
}

impl Searchable for Runner {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.id.as_str(), self.image.name.as_str()];
        if let Some(user) = &self.user {
            fields.push(user.as_str());
        }
        fields.push(self.state.label());
        fields
    }
}
