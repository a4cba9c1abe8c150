//! Lead service: the sales pipeline and lead-to-customer conversion

use std::sync::Arc;

use uuid::Uuid;

use shared::board::{plan_move, Board, MovePlan, MoveRequest};
use shared::query::LeadFilter;
use shared::validation::{validate_customer, validate_lead};
use shared::{
    ActivityKind, ActivityLogEntry, Comment, CommentInput, Customer, CustomerInput, CustomerType,
    Lead, LeadInput, LeadPatch, LeadStatus, StatusToken, Subject,
};

use super::{patched_input, ActivityService};
use crate::error::{AppError, AppResult};
use crate::notifier::{report, Notice, Notifier};
use crate::store::{require, Stores};

#[derive(Clone)]
pub struct LeadService {
    stores: Stores,
    notifier: Arc<dyn Notifier>,
}

impl LeadService {
    /// Create a new LeadService instance
    pub fn new(stores: Stores, notifier: Arc<dyn Notifier>) -> Self {
        Self { stores, notifier }
    }

    fn activity(&self) -> ActivityService {
        ActivityService::new(self.stores.clone(), self.notifier.clone())
    }

    pub async fn list(&self, filter: &LeadFilter) -> AppResult<Vec<Lead>> {
        let leads = self.stores.leads.get_all().await?;
        Ok(filter.apply(&leads))
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Lead> {
        require(self.stores.leads.as_ref(), id).await
    }

    pub async fn create(&self, input: LeadInput) -> AppResult<Lead> {
        let result = async {
            validate_lead(&input)?;
            self.stores.leads.create(input).await
        }
        .await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("הליד נוצר בהצלחה", "Lead created")
        });
        result
    }

    pub async fn update(&self, id: Uuid, patch: LeadPatch) -> AppResult<Lead> {
        let result = self.update_inner(id, patch).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("הליד עודכן בהצלחה", "Lead updated")
        });
        result
    }

    async fn update_inner(&self, id: Uuid, patch: LeadPatch) -> AppResult<Lead> {
        let lead = self.get(id).await?;
        let preview: LeadInput = patched_input(&lead, &patch)?;
        validate_lead(&preview)?;
        self.stores.leads.update(id, patch).await
    }

    pub async fn board(&self, filter: &LeadFilter) -> AppResult<Board<Lead>> {
        let leads = self.list(filter).await?;
        Ok(Board::full(&leads))
    }

    /// Drop a lead card on another pipeline column
    pub async fn move_status(&self, request: MoveRequest<LeadStatus>) -> AppResult<Lead> {
        let result = self.move_status_inner(request).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success(
                format!("הליד הועבר ל-{}", request.to.label_he()),
                format!("Lead moved to {}", request.to.label_en()),
            )
        });
        result
    }

    async fn move_status_inner(&self, request: MoveRequest<LeadStatus>) -> AppResult<Lead> {
        let leads = self.stores.leads.get_all().await?;
        let (from, to) = match plan_move(&leads, &request)? {
            MovePlan::NoOp => return self.get(request.item_id).await,
            MovePlan::Move { from, to } => (from, to),
        };

        let lead = self
            .stores
            .leads
            .update(request.item_id, LeadPatch::status(to))
            .await?;
        self.activity()
            .record(
                Subject::Lead(lead.id),
                ActivityKind::StatusChange,
                format!("סטטוס שונה מ-{} ל-{}", from.label_he(), to.label_he()),
            )
            .await;
        Ok(lead)
    }

    /// Customer form pre-filled from the lead
    pub async fn conversion_prefill(&self, id: Uuid) -> AppResult<CustomerInput> {
        let lead = self.get(id).await?;
        Ok(prefill_customer(&lead))
    }

    /// Create a customer from the lead and mark the lead converted
    pub async fn convert_to_customer(&self, id: Uuid, input: CustomerInput) -> AppResult<Customer> {
        let result = self.convert_inner(id, input).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("הליד הומר ללקוח בהצלחה", "Lead converted to customer")
        });
        result
    }

    async fn convert_inner(&self, id: Uuid, input: CustomerInput) -> AppResult<Customer> {
        let lead = self.get(id).await?;
        if lead.is_converted() {
            return Err(AppError::Conflict {
                resource: "lead".to_string(),
                message: format!("Lead {} was already converted", lead.contact_name),
                message_he: "הליד כבר הומר ללקוח".to_string(),
            });
        }

        let input = input.normalized();
        validate_customer(&input)?;

        // Claim the lead first; it is reopened if the customer cannot be created
        self.stores
            .leads
            .update(id, LeadPatch::status(LeadStatus::Converted))
            .await?;
        let customer = match self.stores.customers.create(input).await {
            Ok(customer) => customer,
            Err(err) => {
                let reopened = self
                    .stores
                    .leads
                    .update(id, LeadPatch::status(lead.status))
                    .await;
                if let Err(reopen) = reopened {
                    tracing::error!(
                        lead_id = %id,
                        error = %reopen,
                        "Lead left converted without a customer"
                    );
                }
                return Err(err);
            }
        };

        tracing::info!(lead_id = %id, customer_id = %customer.id, "Lead converted");
        self.activity()
            .record(
                Subject::Lead(id),
                ActivityKind::Conversion,
                format!("הומר ללקוח {}", customer.display_name()),
            )
            .await;
        Ok(customer)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = self.stores.leads.delete(id).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("הליד נמחק", "Lead deleted")
        });
        result
    }

    pub async fn add_comment(&self, id: Uuid, input: CommentInput) -> AppResult<Comment> {
        self.get(id).await?;
        self.activity().add_comment(Subject::Lead(id), input).await
    }

    pub async fn comments(&self, id: Uuid) -> AppResult<Vec<Comment>> {
        self.get(id).await?;
        self.activity().comments(Subject::Lead(id)).await
    }

    pub async fn history(&self, id: Uuid) -> AppResult<Vec<ActivityLogEntry>> {
        self.get(id).await?;
        self.activity().history(Subject::Lead(id)).await
    }
}

/// A lead with a company becomes a business customer, otherwise a private one
pub fn prefill_customer(lead: &Lead) -> CustomerInput {
    let (first_name, last_name) = lead.split_contact_name();
    let customer_type = if lead.company_name.is_some() {
        CustomerType::Business
    } else {
        CustomerType::Private
    };
    CustomerInput {
        customer_type,
        company_name: lead.company_name.clone(),
        first_name: Some(first_name),
        last_name,
        email: lead.email.clone(),
        phone: lead.phone.clone(),
        ..Default::default()
    }
}
