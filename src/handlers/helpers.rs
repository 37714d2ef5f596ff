use std::collections::HashMap;

use crate::handlers::guarded::Page;
use crate::models::listing::drop_blank_ids;
use crate::models::role::Role;

/// Every role, for labelling role ids and for assignment checkboxes.
/// Best effort: without `roles:list`, or if the fetch fails, it is empty and
/// ids are shown raw.
pub async fn all_roles(page: &Page<'_>) -> Vec<Role> {
    let backend = &page.state.backend;
    match page
        .guard("roles", "list")
        .load(|token| async move { backend.get::<Vec<Role>>("/roles/", &token).await })
        .await
    {
        Ok(roles) => drop_blank_ids(roles, "role"),
        Err(blocked) => {
            log::debug!("Role list unavailable: {blocked:?}");
            Vec::new()
        }
    }
}

/// Role id → name.
pub fn role_names(roles: &[Role]) -> HashMap<String, String> {
    roles
        .iter()
        .filter_map(|r| Some((r.id.clone()?, r.name.clone()?)))
        .collect()
}
