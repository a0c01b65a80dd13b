use api_types::credit_card::CreditCard;
use sea_orm::DatabaseConnection;

use crate::{
    EngineError, ResultEngine, credit_cards,
    repository::CreditCardRepository,
    util::{normalize_required_name, validate_last_four_digits},
};

#[derive(Clone, Debug)]
pub struct CreditCardService {
    credit_cards: CreditCardRepository,
}

impl CreditCardService {
    pub fn new(database: DatabaseConnection) -> Self {
        Self {
            credit_cards: CreditCardRepository::new(database),
        }
    }

    pub async fn get_all(&self) -> ResultEngine<Vec<CreditCard>> {
        Ok(self
            .credit_cards
            .get_all()
            .await?
            .into_iter()
            .map(credit_card_to_dto)
            .collect())
    }

    pub async fn get_by_id(&self, credit_card_id: i32) -> ResultEngine<Option<CreditCard>> {
        Ok(self
            .credit_cards
            .get_by_id(credit_card_id)
            .await?
            .map(credit_card_to_dto))
    }

    /// Stores a new card and writes the generated id back into `card`.
    pub async fn add(&self, card: &mut CreditCard) -> ResultEngine<()> {
        let name = normalize_required_name(&card.credit_card_name, "credit card")?;
        let last_four = validate_last_four_digits(&card.card_last_four_digit)?;

        let stored = self.credit_cards.add(&name, &last_four).await?;
        tracing::info!(credit_card_id = stored.id, "credit card added");
        *card = credit_card_to_dto(stored);
        Ok(())
    }

    pub async fn update(&self, card: &mut CreditCard) -> ResultEngine<()> {
        let credit_card_id = card
            .credit_card_id
            .ok_or_else(|| EngineError::KeyNotFound("credit card id missing".to_string()))?;
        let name = normalize_required_name(&card.credit_card_name, "credit card")?;
        let last_four = validate_last_four_digits(&card.card_last_four_digit)?;

        let stored = self
            .credit_cards
            .update(credit_card_id, &name, &last_four)
            .await?;
        *card = credit_card_to_dto(stored);
        Ok(())
    }

    pub async fn delete(&self, credit_card_id: i32) -> ResultEngine<()> {
        self.credit_cards.delete(credit_card_id).await
    }
}

pub(crate) fn credit_card_to_dto(model: credit_cards::Model) -> CreditCard {
    CreditCard {
        credit_card_id: Some(model.id),
        credit_card_name: model.name,
        card_last_four_digit: model.last_four_digits,
    }
}
