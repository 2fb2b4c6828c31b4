//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use mongodb::bson::DateTime;
use tracing::{debug, info};

use crate::{
    auth::IdentityClaim,
    database::Db,
    domain::carts::{
        errors::{
            CartsServiceError, MAX_QUANTITY, QUANTITY_BELOW_ONE, QUANTITY_NOT_POSITIVE,
            QUANTITY_TOO_LARGE, is_duplicate_key,
        },
        models::{AddItemOutcome, CartLine, CartLineId, NewCartLine},
        repositories::{MongoCartLinesRepository, UpsertedLine},
    },
};

#[derive(Debug, Clone)]
pub struct MongoCartsService {
    repository: MongoCartLinesRepository,
}

impl MongoCartsService {
    #[must_use]
    pub fn new(db: &Db) -> Self {
        Self {
            repository: MongoCartLinesRepository::new(db),
        }
    }

    async fn upsert(
        &self,
        owner: &IdentityClaim,
        line: &NewCartLine,
    ) -> Result<UpsertedLine, CartsServiceError> {
        let now = DateTime::now();

        match self.repository.upsert_line(owner.email(), line, now).await {
            // Two first-time adds raced on the unique index; the loser now matches the winner's line.
            Err(error) if is_duplicate_key(&error) => {
                debug!(product_id = %line.product_id, "retrying cart upsert after duplicate key");

                match self.repository.upsert_line(owner.email(), line, now).await {
                    Err(error) if is_duplicate_key(&error) => {
                        Err(self.rejected_upsert(owner, line, error).await)
                    }
                    result => Ok(result?),
                }
            }
            result => Ok(result?),
        }
    }

    /// Explain an upsert that still collided after its retry.
    async fn rejected_upsert(
        &self,
        owner: &IdentityClaim,
        line: &NewCartLine,
        error: mongodb::error::Error,
    ) -> CartsServiceError {
        let existing = self
            .repository
            .find_line_for_product(owner.email(), &line.user_id, &line.product_id)
            .await;

        match existing {
            Ok(Some(record)) if record.quantity > MAX_QUANTITY - line.quantity => {
                CartsServiceError::InvalidArgument(QUANTITY_TOO_LARGE)
            }
            Ok(_) => error.into(),
            Err(lookup) => lookup.into(),
        }
    }
}

#[async_trait]
impl CartsService for MongoCartsService {
    async fn list_lines(&self, owner: &IdentityClaim) -> Result<Vec<CartLine>, CartsServiceError> {
        self.repository
            .list_lines(owner.email())
            .await?
            .into_iter()
            .map(CartLine::try_from)
            .collect()
    }

    async fn add_item(
        &self,
        owner: &IdentityClaim,
        line: NewCartLine,
    ) -> Result<AddItemOutcome, CartsServiceError> {
        if line.quantity <= 0 {
            return Err(CartsServiceError::InvalidArgument(QUANTITY_NOT_POSITIVE));
        }

        if line.quantity > MAX_QUANTITY {
            return Err(CartsServiceError::InvalidArgument(QUANTITY_TOO_LARGE));
        }

        if line.user_id.trim().is_empty() {
            return Err(CartsServiceError::InvalidArgument("userId is required"));
        }

        if line.product_id.trim().is_empty() {
            return Err(CartsServiceError::InvalidArgument("productId is required"));
        }

        let outcome = match self.upsert(owner, &line).await? {
            UpsertedLine::Inserted(id) => {
                let record = self
                    .repository
                    .find_line(owner.email(), id)
                    .await?
                    .ok_or(CartsServiceError::NotFound)?;

                AddItemOutcome::Created(record.try_into()?)
            }
            UpsertedLine::Matched => {
                let record = self
                    .repository
                    .find_line_for_product(owner.email(), &line.user_id, &line.product_id)
                    .await?
                    .ok_or(CartsServiceError::NotFound)?;

                AddItemOutcome::Updated(record.try_into()?)
            }
        };

        info!(
            product_id = %line.product_id,
            quantity = outcome.line().quantity,
            created = matches!(outcome, AddItemOutcome::Created(_)),
            "added item to cart"
        );

        Ok(outcome)
    }

    async fn set_quantity(
        &self,
        owner: &IdentityClaim,
        line: CartLineId,
        quantity: i64,
    ) -> Result<CartLine, CartsServiceError> {
        if quantity < 1 {
            return Err(CartsServiceError::InvalidArgument(QUANTITY_BELOW_ONE));
        }

        if quantity > MAX_QUANTITY {
            return Err(CartsServiceError::InvalidArgument(QUANTITY_TOO_LARGE));
        }

        self.repository
            .set_quantity(owner.email(), line.into_object_id(), quantity)
            .await?
            .ok_or(CartsServiceError::NotFound)?
            .try_into()
    }

    async fn increment(
        &self,
        owner: &IdentityClaim,
        line: CartLineId,
    ) -> Result<CartLine, CartsServiceError> {
        let id = line.into_object_id();

        if let Some(record) = self.repository.increment(owner.email(), id).await? {
            return record.try_into();
        }

        match self.repository.find_line(owner.email(), id).await? {
            Some(_) => Err(CartsServiceError::InvalidState(QUANTITY_TOO_LARGE)),
            None => Err(CartsServiceError::NotFound),
        }
    }

    async fn decrement(
        &self,
        owner: &IdentityClaim,
        line: CartLineId,
    ) -> Result<CartLine, CartsServiceError> {
        let id = line.into_object_id();

        if let Some(record) = self.repository.decrement(owner.email(), id).await? {
            return record.try_into();
        }

        match self.repository.find_line(owner.email(), id).await? {
            Some(_) => Err(CartsServiceError::InvalidState(QUANTITY_BELOW_ONE)),
            None => Err(CartsServiceError::NotFound),
        }
    }

    async fn remove_item(
        &self,
        owner: &IdentityClaim,
        line: CartLineId,
    ) -> Result<(), CartsServiceError> {
        let deleted = self
            .repository
            .delete_line(owner.email(), line.into_object_id())
            .await?;

        if deleted == 0 {
            return Err(CartsServiceError::NotFound);
        }

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Every line owned by `owner`, newest first.
    async fn list_lines(&self, owner: &IdentityClaim) -> Result<Vec<CartLine>, CartsServiceError>;

    /// Add `line.quantity` units of a product, creating the line on first add.
    async fn add_item(
        &self,
        owner: &IdentityClaim,
        line: NewCartLine,
    ) -> Result<AddItemOutcome, CartsServiceError>;

    /// Overwrite the quantity of an existing line.
    async fn set_quantity(
        &self,
        owner: &IdentityClaim,
        line: CartLineId,
        quantity: i64,
    ) -> Result<CartLine, CartsServiceError>;

    /// Add one unit.
    async fn increment(
        &self,
        owner: &IdentityClaim,
        line: CartLineId,
    ) -> Result<CartLine, CartsServiceError>;

    /// Remove one unit; a line never drops below one.
    async fn decrement(
        &self,
        owner: &IdentityClaim,
        line: CartLineId,
    ) -> Result<CartLine, CartsServiceError>;

    /// Delete a line outright.
    async fn remove_item(
        &self,
        owner: &IdentityClaim,
        line: CartLineId,
    ) -> Result<(), CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use futures_util::future::join_all;
    use testresult::TestResult;

    use crate::test::{TestContext, helpers::new_line};

    use super::*;

    #[tokio::test]
    async fn first_add_creates_line_with_requested_quantity() -> TestResult {
        let ctx = TestContext::new().await;

        let outcome = ctx
            .carts
            .add_item(&ctx.owner, new_line("u1", "p1", 2))
            .await?;

        let AddItemOutcome::Created(line) = outcome else {
            panic!("expected Created, got {outcome:?}");
        };

        assert_eq!(line.quantity, 2);
        assert_eq!(line.email, ctx.owner.email());
        assert_eq!(line.product_id, "p1");
        assert!(line.created_at.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn second_add_increments_existing_line() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.carts
            .add_item(&ctx.owner, new_line("u1", "p1", 2))
            .await?;

        let outcome = ctx
            .carts
            .add_item(&ctx.owner, new_line("u1", "p1", 3))
            .await?;

        assert!(
            matches!(&outcome, AddItemOutcome::Updated(line) if line.quantity == 5),
            "expected Updated with quantity 5, got {outcome:?}"
        );

        let lines = ctx.carts.list_lines(&ctx.owner).await?;

        assert_eq!(lines.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_adds_converge_on_one_line() -> TestResult {
        let ctx = TestContext::new().await;

        let results = join_all(
            (0..8).map(|_| ctx.carts.add_item(&ctx.owner, new_line("u1", "p1", 1))),
        )
        .await;

        for result in results {
            result?;
        }

        let lines = ctx.carts.list_lines(&ctx.owner).await?;

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 8);

        Ok(())
    }

    #[tokio::test]
    async fn add_rejects_non_positive_quantity() {
        let ctx = TestContext::new().await;

        for quantity in [0, -3] {
            let result = ctx
                .carts
                .add_item(&ctx.owner, new_line("u1", "p1", quantity))
                .await;

            assert!(
                matches!(result, Err(CartsServiceError::InvalidArgument(_))),
                "expected InvalidArgument for {quantity}, got {result:?}"
            );
        }
    }

    #[tokio::test]
    async fn add_rejects_blank_product() {
        let ctx = TestContext::new().await;

        let result = ctx
            .carts
            .add_item(&ctx.owner, new_line("u1", "  ", 1))
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidArgument(_))),
            "expected InvalidArgument, got {result:?}"
        );
    }

    #[tokio::test]
    async fn add_rejects_quantity_above_cap_without_storing() -> TestResult {
        let ctx = TestContext::new().await;

        let result = ctx
            .carts
            .add_item(&ctx.owner, new_line("u1", "p1", 6_000_000_000))
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidArgument(QUANTITY_TOO_LARGE))),
            "expected InvalidArgument, got {result:?}"
        );
        assert!(ctx.carts.list_lines(&ctx.owner).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn add_that_would_cross_cap_keeps_existing_line() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.carts
            .add_item(&ctx.owner, new_line("u1", "p1", 3_000_000_000))
            .await?;

        let result = ctx
            .carts
            .add_item(&ctx.owner, new_line("u1", "p1", 3_000_000_000))
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidArgument(QUANTITY_TOO_LARGE))),
            "expected InvalidArgument, got {result:?}"
        );

        let lines = ctx.carts.list_lines(&ctx.owner).await?;

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 3_000_000_000);

        Ok(())
    }

    #[tokio::test]
    async fn add_up_to_cap_is_accepted() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.carts
            .add_item(&ctx.owner, new_line("u1", "p1", MAX_QUANTITY - 1))
            .await?;

        let outcome = ctx
            .carts
            .add_item(&ctx.owner, new_line("u1", "p1", 1))
            .await?;

        assert_eq!(outcome.line().quantity, u32::MAX);

        Ok(())
    }

    #[tokio::test]
    async fn increment_at_cap_is_refused() -> TestResult {
        let ctx = TestContext::new().await;

        let line = ctx
            .carts
            .add_item(&ctx.owner, new_line("u1", "p1", MAX_QUANTITY))
            .await?
            .line()
            .id;

        let result = ctx.carts.increment(&ctx.owner, line).await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidState(QUANTITY_TOO_LARGE))),
            "expected InvalidState, got {result:?}"
        );
        assert_eq!(ctx.carts.list_lines(&ctx.owner).await?[0].quantity, u32::MAX);

        Ok(())
    }

    #[tokio::test]
    async fn owners_sharing_a_user_id_get_separate_lines() -> TestResult {
        let ctx = TestContext::new().await;
        let other = ctx.identity("other@x.com");

        ctx.carts
            .add_item(&other, new_line("u1", "p1", 4))
            .await?;

        let outcome = ctx
            .carts
            .add_item(&ctx.owner, new_line("u1", "p1", 1))
            .await?;

        assert!(
            matches!(&outcome, AddItemOutcome::Created(line) if line.quantity == 1),
            "expected Created with quantity 1, got {outcome:?}"
        );

        let again = ctx
            .carts
            .add_item(&ctx.owner, new_line("u1", "p1", 2))
            .await?;

        assert_eq!(again.line().quantity, 3);
        assert_eq!(ctx.carts.list_lines(&other).await?[0].quantity, 4);

        Ok(())
    }

    #[tokio::test]
    async fn decrement_stops_at_one() -> TestResult {
        let ctx = TestContext::new().await;

        let line = ctx
            .carts
            .add_item(&ctx.owner, new_line("u1", "p1", 2))
            .await?
            .line()
            .id;

        let decremented = ctx.carts.decrement(&ctx.owner, line).await?;

        assert_eq!(decremented.quantity, 1);

        let result = ctx.carts.decrement(&ctx.owner, line).await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidState(QUANTITY_BELOW_ONE))),
            "expected InvalidState, got {result:?}"
        );

        let lines = ctx.carts.list_lines(&ctx.owner).await?;

        assert_eq!(lines[0].quantity, 1);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_decrements_never_go_below_one() -> TestResult {
        let ctx = TestContext::new().await;

        let line = ctx
            .carts
            .add_item(&ctx.owner, new_line("u1", "p1", 3))
            .await?
            .line()
            .id;

        let results = join_all((0..6).map(|_| ctx.carts.decrement(&ctx.owner, line))).await;

        let succeeded = results.iter().filter(|result| result.is_ok()).count();

        assert_eq!(succeeded, 2);

        let lines = ctx.carts.list_lines(&ctx.owner).await?;

        assert_eq!(lines[0].quantity, 1);

        Ok(())
    }

    #[tokio::test]
    async fn increment_then_decrement_restores_quantity() -> TestResult {
        let ctx = TestContext::new().await;

        for initial in [1, 3] {
            let product = format!("p{initial}");
            let line = ctx
                .carts
                .add_item(&ctx.owner, new_line("u1", &product, initial))
                .await?
                .line()
                .id;

            let incremented = ctx.carts.increment(&ctx.owner, line).await?;
            let restored = ctx.carts.decrement(&ctx.owner, line).await?;

            assert_eq!(i64::from(incremented.quantity), initial + 1);
            assert_eq!(i64::from(restored.quantity), initial);
        }

        Ok(())
    }

    #[tokio::test]
    async fn set_quantity_overwrites_and_rejects_out_of_range() -> TestResult {
        let ctx = TestContext::new().await;

        let line = ctx
            .carts
            .add_item(&ctx.owner, new_line("u1", "p1", 1))
            .await?
            .line()
            .id;

        let updated = ctx.carts.set_quantity(&ctx.owner, line, 7).await?;

        assert_eq!(updated.quantity, 7);

        let result = ctx.carts.set_quantity(&ctx.owner, line, 0).await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidArgument(_))),
            "expected InvalidArgument, got {result:?}"
        );

        let result = ctx
            .carts
            .set_quantity(&ctx.owner, line, MAX_QUANTITY + 1)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidArgument(QUANTITY_TOO_LARGE))),
            "expected InvalidArgument, got {result:?}"
        );
        assert_eq!(ctx.carts.list_lines(&ctx.owner).await?[0].quantity, 7);

        Ok(())
    }

    #[tokio::test]
    async fn set_quantity_unknown_line_is_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .carts
            .set_quantity(&ctx.owner, CartLineId::new(), 2)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn remove_item_deletes_line_then_reports_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let line = ctx
            .carts
            .add_item(&ctx.owner, new_line("u1", "p1", 1))
            .await?
            .line()
            .id;

        ctx.carts.remove_item(&ctx.owner, line).await?;

        assert!(ctx.carts.list_lines(&ctx.owner).await?.is_empty());

        let result = ctx.carts.remove_item(&ctx.owner, line).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn lines_are_not_visible_to_other_owners() -> TestResult {
        let ctx = TestContext::new().await;
        let other = ctx.identity("other@x.com");

        let line = ctx
            .carts
            .add_item(&ctx.owner, new_line("u1", "p1", 2))
            .await?
            .line()
            .id;

        assert!(ctx.carts.list_lines(&other).await?.is_empty());

        let result = ctx.carts.decrement(&other, line).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        let result = ctx.carts.remove_item(&other, line).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn list_lines_returns_newest_first() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.carts
            .add_item(&ctx.owner, new_line("u1", "p1", 1))
            .await?;

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        ctx.carts
            .add_item(&ctx.owner, new_line("u1", "p2", 1))
            .await?;

        let lines = ctx.carts.list_lines(&ctx.owner).await?;

        let products: Vec<_> = lines.iter().map(|line| line.product_id.as_str()).collect();

        assert_eq!(products, ["p2", "p1"]);

        Ok(())
    }
}
