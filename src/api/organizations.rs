//! Organizations: listing, details, membership, and creation.

// self
use crate::{
	_prelude::*,
	client::{EventHubClient, RequestOptions},
	http::ApiHttpClient,
	model::{
		InviteCode, Member, OrganizationDetail, OrganizationEvents, OrganizationId,
		OrganizationList,
	},
};

#[derive(Serialize)]
struct NewOrganization<'a> {
	organization_name: &'a str,
}

#[derive(Deserialize)]
struct Members {
	#[serde(default, deserialize_with = "crate::model::null_as_empty")]
	members: Vec<Member>,
}

impl<C> EventHubClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Organizations the user joined or founded.
	pub async fn organizations(&self) -> Result<OrganizationList> {
		self.call_json("organizations", "api/organizations", RequestOptions::get()).await
	}

	/// One organization with the caller's founder flag.
	pub async fn organization(&self, id: OrganizationId) -> Result<OrganizationDetail> {
		self.call_json("organization", &format!("api/organizations/{id}"), RequestOptions::get())
			.await
	}

	/// Active and completed events hosted by the organization.
	pub async fn organization_events(&self, id: OrganizationId) -> Result<OrganizationEvents> {
		self.call_json(
			"organization_events",
			&format!("api/organizations/{id}/events"),
			RequestOptions::get(),
		)
		.await
	}

	/// Members of the organization.
	pub async fn organization_members(&self, id: OrganizationId) -> Result<Vec<Member>> {
		let body: Members = self
			.call_json(
				"organization_members",
				&format!("api/organizations/{id}/members"),
				RequestOptions::get(),
			)
			.await?;

		Ok(body.members)
	}

	/// Founds a new organization; a taken name surfaces as [`Error::Rejected`] (`409`).
	pub async fn create_organization(&self, name: &str) -> Result<()> {
		let name = name.trim();

		if name.is_empty() {
			return Err(Error::invalid_input("organization name is required"));
		}

		let options = RequestOptions::post().json(&NewOrganization { organization_name: name })?;

		self.call("create_organization", "api/organizations", options).await?;

		Ok(())
	}

	/// Joins the organization owning `code`; the code is upper-cased before sending.
	pub async fn join_organization(&self, code: &str) -> Result<()> {
		let code = InviteCode::new(code)?;

		self.call(
			"join_organization",
			&format!("api/organizations/join/{code}"),
			RequestOptions::post(),
		)
		.await?;

		Ok(())
	}
}
