//! Command execution.
//!
//! Every command builds a fresh list controller, loads what it needs and
//! returns the text to print. Notifications are emitted by the services as a
//! side effect; the returned text is the command's result.

use std::str::FromStr;

use anyhow::{bail, Context as _};
use client::controller::{load_dashboard, ListController, Mutation};
use client::services::{
    CatalogClient, DraftOf, EntityService, OrderMutator, ResourceService, RestEntity,
    StatusMutator,
};
use domain::models::{
    Draft, EventDraft, HasStatus, OrderDirection, PartnerDraft, ProductDraft, ProductEvent,
    ProductEventDraft, Sortable, Subscription, SubscriptionDraft, UnknownVariant,
};
use domain::services::{group_by_product, CatalogIndex, EntityForm, SortDirection};
use serde::Serialize;
use tracing::debug;

use crate::cli::{
    Command, DeleteArgs, ListArgs, NamedCommand, NamedFields, PartnerCommand, PartnerFields,
    ProductEventCommand, ProductEventFields, SubscriptionCommand, SubscriptionFields,
};
use crate::render::{self, Row};

/// Everything a command needs to run.
#[derive(Clone)]
pub struct Context {
    pub client: CatalogClient,
    pub page_size: usize,
    pub json: bool,
}

impl Context {
    pub fn new(client: CatalogClient, page_size: usize, json: bool) -> Self {
        Self {
            client,
            page_size,
            json,
        }
    }

    fn controller<S: EntityService + Clone>(&self, service: &S) -> ListController<S> {
        ListController::with_page_size(service.clone(), self.page_size)
    }
}

/// Records the console can list, sort and print.
pub trait ConsoleEntity: RestEntity + Row + Serialize {
    fn parse_sort_key(raw: &str) -> Result<Self::SortKey, UnknownVariant>;
}

impl<E> ConsoleEntity for E
where
    E: RestEntity + Row + Serialize,
    E::SortKey: FromStr<Err = UnknownVariant>,
{
    fn parse_sort_key(raw: &str) -> Result<Self::SortKey, UnknownVariant> {
        raw.parse()
    }
}

/// Drafts made of a name and a description.
pub trait NamedDraft {
    fn set_name(&mut self, name: String);
    fn set_description(&mut self, description: String);
}

impl NamedDraft for ProductDraft {
    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn set_description(&mut self, description: String) {
        self.description = description;
    }
}

impl NamedDraft for EventDraft {
    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn set_description(&mut self, description: String) {
        self.description = description;
    }
}

pub async fn run(command: Command, ctx: &Context) -> anyhow::Result<String> {
    match command {
        Command::Dashboard => {
            let stats = load_dashboard(&ctx.client).await;
            if ctx.json {
                Ok(serde_json::to_string_pretty(&stats)?)
            } else {
                Ok(render::dashboard(&stats))
            }
        }
        Command::Products { command } => named(ctx, &ctx.client.products, command).await,
        Command::Events { command } => named(ctx, &ctx.client.events, command).await,
        Command::Partners { command } => partners(ctx, command).await,
        Command::ProductEvents { command } => product_events(ctx, command).await,
        Command::Subscriptions { command } => subscriptions(ctx, command).await,
    }
}

async fn named<E>(
    ctx: &Context,
    service: &ResourceService<E>,
    command: NamedCommand,
) -> anyhow::Result<String>
where
    E: ConsoleEntity,
    E::Draft: NamedDraft,
{
    let controller = ctx.controller(service);
    match command {
        NamedCommand::List(args) => {
            controller.refresh().await?;
            list_view(&controller, &args, ctx.json)
        }
        NamedCommand::Create(fields) => {
            let saved = save(&controller, None, |form| fill_named(form, fields)).await?;
            output_record(&saved, ctx.json)
        }
        NamedCommand::Update { id, fields } => {
            let saved = save(&controller, Some(id), |form| fill_named(form, fields)).await?;
            output_record(&saved, ctx.json)
        }
        NamedCommand::Delete(args) => delete(&controller, args).await,
    }
}

async fn partners(ctx: &Context, command: PartnerCommand) -> anyhow::Result<String> {
    let controller = ctx.controller(&ctx.client.partners);
    match command {
        PartnerCommand::List(args) => {
            controller.refresh().await?;
            list_view(&controller, &args, ctx.json)
        }
        PartnerCommand::Create(fields) => {
            let saved = save(&controller, None, |form| fill_partner(form, fields)).await?;
            output_record(&saved, ctx.json)
        }
        PartnerCommand::Update { id, fields } => {
            let saved = save(&controller, Some(id), |form| fill_partner(form, fields)).await?;
            output_record(&saved, ctx.json)
        }
        PartnerCommand::Delete(args) => delete(&controller, args).await,
        PartnerCommand::ToggleStatus { id } => toggle_status(&controller, id, ctx.json).await,
    }
}

async fn product_events(ctx: &Context, command: ProductEventCommand) -> anyhow::Result<String> {
    let controller = ctx.controller(&ctx.client.product_events);
    match command {
        ProductEventCommand::List {
            list,
            product,
            grouped,
        } => {
            let items = match product {
                Some(product_id) => {
                    ctx.client
                        .product_events
                        .list_by_product(product_id)
                        .await?
                }
                None => ctx.client.product_events.list().await?,
            };
            let items = hydrate_mappings(&ctx.client, items).await;
            controller.update_items(|current| *current = items);

            if grouped && !ctx.json {
                return Ok(render::groups(&group_by_product(&controller.items())));
            }
            list_view(&controller, &list, ctx.json)
        }
        ProductEventCommand::Create(fields) => {
            let saved = save(&controller, None, |form| fill_mapping(form, fields)).await?;
            output_record(&saved, ctx.json)
        }
        ProductEventCommand::Update { id, fields } => {
            let saved = save(&controller, Some(id), |form| fill_mapping(form, fields)).await?;
            output_record(&saved, ctx.json)
        }
        ProductEventCommand::Delete(args) => {
            load_hydrated_mappings(&ctx.client, &controller).await?;
            delete_loaded(&controller, args).await
        }
        ProductEventCommand::Move { id, direction } => {
            controller.refresh().await?;
            move_mapping(&controller, id, direction, ctx.json).await
        }
    }
}

async fn subscriptions(ctx: &Context, command: SubscriptionCommand) -> anyhow::Result<String> {
    let controller = ctx.controller(&ctx.client.subscriptions);
    match command {
        SubscriptionCommand::List { list, partner } => {
            let items = match partner {
                Some(partner_id) => {
                    ctx.client
                        .subscriptions
                        .list_by_partner(partner_id)
                        .await?
                }
                None => ctx.client.subscriptions.list().await?,
            };
            let items = hydrate_subscriptions(&ctx.client, items).await;
            controller.update_items(|current| *current = items);
            list_view(&controller, &list, ctx.json)
        }
        SubscriptionCommand::Create(fields) => {
            let saved = save(&controller, None, |form| fill_subscription(form, fields)).await?;
            output_record(&saved, ctx.json)
        }
        SubscriptionCommand::Update { id, fields } => {
            let saved =
                save(&controller, Some(id), |form| fill_subscription(form, fields)).await?;
            output_record(&saved, ctx.json)
        }
        SubscriptionCommand::Delete(args) => delete(&controller, args).await,
        SubscriptionCommand::ToggleStatus { id } => {
            toggle_status(&controller, id, ctx.json).await
        }
    }
}

/// Applies the search, sort and page flags to the controller.
fn apply_list_args<S>(controller: &ListController<S>, args: &ListArgs) -> anyhow::Result<()>
where
    S: EntityService,
    S::Entity: ConsoleEntity,
{
    if let Some(query) = &args.query {
        controller.set_query(query.as_str());
    }

    let direction = if args.desc {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };
    let key = match &args.sort {
        Some(raw) => <S::Entity as ConsoleEntity>::parse_sort_key(raw)?,
        None => <S::Entity as Sortable>::default_sort_key(),
    };
    controller.set_sort(key, direction);
    controller.set_page(args.page);
    Ok(())
}

fn list_view<S>(controller: &ListController<S>, args: &ListArgs, json: bool) -> anyhow::Result<String>
where
    S: EntityService,
    S::Entity: ConsoleEntity,
{
    apply_list_args(controller, args)?;
    let view = controller.view();
    if json {
        Ok(serde_json::to_string_pretty(&view.page)?)
    } else {
        Ok(render::view(&view))
    }
}

fn output_record<E: ConsoleEntity>(record: &E, json: bool) -> anyhow::Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(record)?)
    } else {
        Ok(render::table(std::slice::from_ref(record)))
    }
}

/// Opens a form (pre-filled from the server copy when editing), lets `fill`
/// apply the given fields and submits it.
async fn save<S, F>(
    controller: &ListController<S>,
    id: Option<i64>,
    fill: F,
) -> anyhow::Result<S::Entity>
where
    S: EntityService,
    F: FnOnce(&mut EntityForm<DraftOf<S::Entity>>),
{
    let existing = match id {
        Some(id) => Some(controller.service().get(id).await?),
        None => None,
    };

    let mut form = EntityForm::new();
    form.open(existing.as_ref());
    fill(&mut form);

    match controller.submit(&mut form).await? {
        Mutation::Applied(record) => Ok(record),
        Mutation::Busy | Mutation::Skipped => bail!(
            "The {} was not saved",
            <S::Entity as RestEntity>::RESOURCE.singular
        ),
    }
}

fn fill_named<D: NamedDraft + Draft>(form: &mut EntityForm<D>, fields: NamedFields) {
    let NamedFields { name, description } = fields;
    form.edit(|draft| {
        if let Some(name) = name {
            draft.set_name(name);
        }
        if let Some(description) = description {
            draft.set_description(description);
        }
    });
}

fn fill_partner(form: &mut EntityForm<PartnerDraft>, fields: PartnerFields) {
    let PartnerFields {
        merchant_number,
        name,
        partner_id,
        client_id,
        status,
    } = fields;
    form.edit(|draft| {
        if let Some(merchant_number) = merchant_number {
            draft.merchant_number = merchant_number;
        }
        if let Some(name) = name {
            draft.name = name;
        }
        if let Some(partner_id) = partner_id {
            draft.partner_id = partner_id;
        }
        if let Some(client_id) = client_id {
            draft.client_id = client_id;
        }
    });
    if let Some(status) = status {
        form.set_status_input(&status);
    }
}

fn fill_mapping(form: &mut EntityForm<ProductEventDraft>, fields: ProductEventFields) {
    form.edit(|draft| {
        if let Some(product_id) = fields.product_id {
            draft.product_id = product_id;
        }
        if let Some(event_id) = fields.event_id {
            draft.event_id = event_id;
        }
        if let Some(order) = fields.order {
            draft.order = order;
        }
    });
}

fn fill_subscription(form: &mut EntityForm<SubscriptionDraft>, fields: SubscriptionFields) {
    form.edit(|draft| {
        if let Some(partner_id) = fields.partner_id {
            draft.partner_id = partner_id;
        }
        if let Some(product_event_id) = fields.product_event_id {
            draft.product_event_id = product_event_id;
        }
    });
    if let Some(status) = fields.status {
        form.set_status_input(&status);
    }
}

async fn delete<S>(controller: &ListController<S>, args: DeleteArgs) -> anyhow::Result<String>
where
    S: EntityService,
{
    controller.refresh().await?;
    delete_loaded(controller, args).await
}

/// Two-step delete over an already loaded list. Without `--yes` only the
/// confirmation prompt is returned and nothing is sent.
async fn delete_loaded<S>(controller: &ListController<S>, args: DeleteArgs) -> anyhow::Result<String>
where
    S: EntityService,
{
    let resource = <S::Entity as RestEntity>::RESOURCE;
    let Some(prompt) = controller.request_remove(args.id) else {
        bail!("No {} with id {}", resource.singular, args.id);
    };

    if !args.yes {
        controller.cancel_remove();
        return Ok(format!("{prompt}\nRe-run with --yes to confirm."));
    }

    match controller.confirm_remove().await? {
        Mutation::Applied(id) => Ok(format!("Deleted {} {}", resource.singular, id)),
        Mutation::Busy | Mutation::Skipped => bail!("The {} was not deleted", resource.singular),
    }
}

async fn toggle_status<S>(controller: &ListController<S>, id: i64, json: bool) -> anyhow::Result<String>
where
    S: StatusMutator,
    S::Entity: ConsoleEntity + HasStatus<Status = S::Status>,
{
    let resource = <S::Entity as RestEntity>::RESOURCE;
    controller.refresh().await?;
    if controller.find(id).is_none() {
        bail!("No {} with id {}", resource.singular, id);
    }

    match controller.toggle_status(id).await? {
        Mutation::Applied(record) => output_record(&record, json),
        Mutation::Busy | Mutation::Skipped => {
            bail!("The {} status was not changed", resource.singular)
        }
    }
}

async fn move_mapping<S>(
    controller: &ListController<S>,
    id: i64,
    direction: OrderDirection,
    json: bool,
) -> anyhow::Result<String>
where
    S: OrderMutator<Entity = ProductEvent>,
{
    let Some(target) = controller.find(id) else {
        bail!("No product event with id {}", id);
    };

    match controller.reorder(id, direction).await? {
        Mutation::Applied(updated) => {
            if json {
                return output_record(&updated, json);
            }
            let position = controller
                .position(id)
                .context("moved mapping is missing from the list")?;
            Ok(format!(
                "Moved mapping {} {} to order {} (position {} of {})",
                id,
                direction,
                updated.order,
                position.index + 1,
                position.count
            ))
        }
        Mutation::Skipped => bail!(
            "Mapping {} cannot move {} from order {}",
            id,
            direction,
            target.order
        ),
        Mutation::Busy => bail!("Mapping {} was not moved", id),
    }
}

/// Loads every mapping with its product and event names filled in.
async fn load_hydrated_mappings<S>(
    client: &CatalogClient,
    controller: &ListController<S>,
) -> anyhow::Result<()>
where
    S: EntityService<Entity = ProductEvent>,
{
    let items = controller.service().list().await?;
    let items = hydrate_mappings(client, items).await;
    controller.update_items(|current| *current = items);
    Ok(())
}

/// Fills product and event names the server did not embed. Lookup lists
/// that fail to load are treated as empty.
async fn hydrate_mappings(client: &CatalogClient, mut items: Vec<ProductEvent>) -> Vec<ProductEvent> {
    if items.iter().all(|pe| pe.product.is_some() && pe.event.is_some()) {
        return items;
    }

    let (products, events) = tokio::join!(client.products.list(), client.events.list());
    let index = CatalogIndex::new(
        &products.unwrap_or_default(),
        &events.unwrap_or_default(),
        &[],
        &[],
    );
    for pe in &mut items {
        index.hydrate_product_event(pe);
    }
    debug!(count = items.len(), "Hydrated product event mappings");
    items
}

async fn hydrate_subscriptions(
    client: &CatalogClient,
    mut items: Vec<Subscription>,
) -> Vec<Subscription> {
    if items
        .iter()
        .all(|sub| sub.partner.is_some() && sub.product_event.is_some())
    {
        return items;
    }

    let (products, events, partners, product_events) = tokio::join!(
        client.products.list(),
        client.events.list(),
        client.partners.list(),
        client.product_events.list()
    );
    let index = CatalogIndex::new(
        &products.unwrap_or_default(),
        &events.unwrap_or_default(),
        &partners.unwrap_or_default(),
        &product_events.unwrap_or_default(),
    );
    for sub in &mut items {
        index.hydrate_subscription(sub);
    }
    debug!(count = items.len(), "Hydrated subscriptions");
    items
}
