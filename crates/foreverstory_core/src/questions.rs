//! crates/foreverstory_core/src/questions.rs
//!
//! The question bank and the queue builder that decides which questions a
//! subscription receives, and in which order.
//!
//! The bank is plain reference data injected by the caller. `QuestionBank::german_default()`
//! returns the production bank; tests build their own fixtures with `QuestionBank::new`.

use std::collections::{HashSet, VecDeque};

use crate::domain::{Question, QuestionCategory, Region};
use crate::validation::{ValidationError, ValidationResult};

//=========================================================================================
// Category Metadata
//=========================================================================================

/// Display metadata for a question category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryInfo {
    pub label_de: &'static str,
    pub label_en: &'static str,
    pub description: &'static str,
    pub sort_order: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    De,
    En,
}

impl QuestionCategory {
    pub fn info(&self) -> CategoryInfo {
        let (label_de, label_en, description, sort_order) = match self {
            QuestionCategory::Childhood => (
                "Kindheit",
                "Childhood",
                "Fragen über frühe Jahre, Familie und Kindheitserinnerungen",
                1,
            ),
            QuestionCategory::Education => (
                "Ausbildung",
                "Education",
                "Schule, Ausbildung, Studium und Lernwege",
                2,
            ),
            QuestionCategory::Career => (
                "Beruf",
                "Career",
                "Arbeitsleben, Karriere und berufliche Erfahrungen",
                3,
            ),
            QuestionCategory::Family => (
                "Familie",
                "Family",
                "Familiengründung, Kinder und Familienleben",
                4,
            ),
            QuestionCategory::Relationships => (
                "Beziehungen",
                "Relationships",
                "Freundschaften, Liebe und wichtige Menschen",
                5,
            ),
            QuestionCategory::WarPostwar => (
                "Krieg und Nachkriegszeit",
                "War and post-war period",
                "Erinnerungen an Krieg, Wiederaufbau und Nachkriegszeit",
                6,
            ),
            QuestionCategory::Ddr => (
                "DDR-Erinnerungen",
                "GDR memories",
                "Leben in der DDR und Alltagserfahrungen",
                7,
            ),
            QuestionCategory::Reunification => (
                "Wiedervereinigung",
                "Reunification",
                "Die Wende und Wiedervereinigung Deutschlands",
                8,
            ),
            QuestionCategory::Traditions => (
                "Traditionen",
                "Traditions",
                "Familientraditionen, Feste und Bräuche",
                9,
            ),
            QuestionCategory::LifeLessons => (
                "Lebensweisheiten",
                "Life lessons",
                "Erkenntnisse, Ratschläge und Lebenserfahrungen",
                10,
            ),
            QuestionCategory::Custom => (
                "Persönliche Fragen",
                "Personal questions",
                "Individuelle Fragen von Familienmitgliedern",
                11,
            ),
        };
        CategoryInfo {
            label_de,
            label_en,
            description,
            sort_order,
        }
    }

    pub fn label(&self, locale: Locale) -> &'static str {
        let info = self.info();
        match locale {
            Locale::De => info.label_de,
            Locale::En => info.label_en,
        }
    }

    /// Categories whose questions only make sense for some historical or regional backgrounds.
    pub fn is_region_specific(&self) -> bool {
        matches!(
            self,
            QuestionCategory::Ddr | QuestionCategory::Reunification | QuestionCategory::WarPostwar
        )
    }
}

//=========================================================================================
// Queue Request
//=========================================================================================

/// Parameters for building a subscription's question queue.
#[derive(Debug, Clone)]
pub struct QueueRequest {
    pub total_questions: usize,
    pub region: Region,
    pub custom_questions: Vec<String>,
    pub exclude_categories: HashSet<QuestionCategory>,
}

impl QueueRequest {
    pub fn new(total_questions: usize, region: Region) -> Self {
        Self {
            total_questions,
            region,
            custom_questions: Vec::new(),
            exclude_categories: HashSet::new(),
        }
    }

    pub fn with_custom_questions(mut self, custom_questions: Vec<String>) -> Self {
        self.custom_questions = custom_questions;
        self
    }

    pub fn excluding(mut self, categories: impl IntoIterator<Item = QuestionCategory>) -> Self {
        self.exclude_categories.extend(categories);
        self
    }
}

//=========================================================================================
// Question Bank
//=========================================================================================

/// Read-only reference list of questions.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Builds the ordered queue of questions for a new subscription.
    ///
    /// Questions are filtered by excluded categories and region, grouped by category in
    /// order of first appearance, then taken round-robin across the groups. Custom questions
    /// are spliced in at evenly spaced positions and the result is truncated (never padded)
    /// to `total_questions`.
    pub fn build_queue(&self, request: &QueueRequest) -> ValidationResult<Vec<Question>> {
        if request.total_questions == 0 {
            return Err(ValidationError::InvalidQuestionCount(request.total_questions));
        }

        let mut groups: Vec<(QuestionCategory, VecDeque<&Question>)> = Vec::new();
        let eligible = self.questions.iter().filter(|q| {
            !request.exclude_categories.contains(&q.category) && q.region.is_eligible_for(request.region)
        });
        for question in eligible {
            match groups.iter_mut().find(|(category, _)| *category == question.category) {
                Some((_, group)) => group.push_back(question),
                None => groups.push((question.category, VecDeque::from([question]))),
            }
        }

        let wanted = request
            .total_questions
            .saturating_sub(request.custom_questions.len());
        let mut queue: Vec<Question> = Vec::with_capacity(request.total_questions);

        // The rotating index advances on every visit, including the one that finds a group
        // empty and drops it, so the category after a dropped one can be passed over once.
        let mut category_index = 0usize;
        while queue.len() < wanted && !groups.is_empty() {
            let slot = category_index % groups.len();
            match groups[slot].1.pop_front() {
                Some(question) => queue.push(question.clone()),
                None => {
                    groups.remove(slot);
                }
            }
            category_index += 1;
        }

        if !request.custom_questions.is_empty() {
            let interval = queue.len() / (request.custom_questions.len() + 1);
            let mut last_position: Option<usize> = None;
            for (i, text) in request.custom_questions.iter().enumerate() {
                let mut position = interval * (i + 1);
                // With fewer pooled questions than slots the interval collapses to zero;
                // keep custom questions in their given order instead of stacking them in reverse.
                if let Some(last) = last_position {
                    position = position.max(last + 1);
                }
                let position = position.min(queue.len());
                queue.insert(position, Question::custom(text.as_str()));
                last_position = Some(position);
            }
        }

        queue.truncate(request.total_questions);
        Ok(queue)
    }

    /// The production bank of German biographical questions.
    pub fn german_default() -> Self {
        use QuestionCategory::*;

        let all = |de: &str, en: &str, category| Question::new(de, en, category, Region::All);
        let east = |de: &str, en: &str, category| Question::new(de, en, category, Region::EastGermany);

        Self::new(vec![
            all(
                "Was ist Ihre früheste Kindheitserinnerung?",
                "What is your earliest childhood memory?",
                Childhood,
            ),
            all(
                "Wo sind Sie aufgewachsen und wie war Ihr Zuhause?",
                "Where did you grow up and what was your home like?",
                Childhood,
            ),
            all(
                "Was war Ihr Lieblingsspielzeug oder -spiel als Kind?",
                "What was your favorite toy or game as a child?",
                Childhood,
            ),
            all(
                "Erzählen Sie von Ihren Geschwistern und wie Sie zusammen aufgewachsen sind.",
                "Tell us about your siblings and how you grew up together.",
                Childhood,
            ),
            all(
                "Welche Familientraditionen gab es in Ihrer Kindheit?",
                "What family traditions did you have during your childhood?",
                Childhood,
            ),
            all(
                "Wie war Ihr erster Schultag?",
                "What was your first day of school like?",
                Education,
            ),
            all(
                "Wer war Ihr Lieblingslehrer und warum?",
                "Who was your favorite teacher and why?",
                Education,
            ),
            all(
                "Was war Ihr Lieblingsfach in der Schule?",
                "What was your favorite subject in school?",
                Education,
            ),
            all(
                "Was war Ihr erster Job und wie haben Sie ihn bekommen?",
                "What was your first job and how did you get it?",
                Career,
            ),
            all(
                "Erzählen Sie von Ihrem größten beruflichen Erfolg.",
                "Tell us about your greatest professional achievement.",
                Career,
            ),
            all(
                "Welchen Beruf wollten Sie als Kind ergreifen?",
                "What job did you want to have as a child?",
                Career,
            ),
            all(
                "Wie haben Sie Ihren Partner / Ihre Partnerin kennengelernt?",
                "How did you meet your partner?",
                Family,
            ),
            all(
                "Was ist Ihre schönste Erinnerung an Ihre Hochzeit?",
                "What is your best memory of your wedding?",
                Family,
            ),
            all(
                "Erzählen Sie von der Geburt Ihrer Kinder.",
                "Tell us about the birth of your children.",
                Family,
            ),
            all(
                "Welche Werte wollten Sie Ihren Kindern mitgeben?",
                "What values did you want to pass on to your children?",
                Family,
            ),
            all(
                "Wer war Ihr bester Freund in der Kindheit und was haben Sie zusammen erlebt?",
                "Who was your best friend in childhood and what did you experience together?",
                Relationships,
            ),
            all(
                "Erzählen Sie von einer Person, die Ihr Leben geprägt hat.",
                "Tell us about a person who shaped your life.",
                Relationships,
            ),
            all(
                "Wie haben Sie den Krieg und die Nachkriegszeit erlebt?",
                "How did you experience the war and post-war period?",
                WarPostwar,
            ),
            all(
                "Was erinnern Sie sich an den Wiederaufbau nach dem Krieg?",
                "What do you remember about the reconstruction after the war?",
                WarPostwar,
            ),
            east(
                "Wie war der Alltag in der DDR?",
                "What was everyday life like in the GDR?",
                Ddr,
            ),
            east(
                "Welche Erinnerungen haben Sie an die Jugendweihe?",
                "What memories do you have of the Jugendweihe ceremony?",
                Ddr,
            ),
            all(
                "Wo waren Sie am 9. November 1989 und wie haben Sie den Mauerfall erlebt?",
                "Where were you on November 9, 1989 and how did you experience the fall of the Berlin Wall?",
                Reunification,
            ),
            all(
                "Wie hat die Wiedervereinigung Ihr Leben verändert?",
                "How did reunification change your life?",
                Reunification,
            ),
            all(
                "Wie haben Sie früher Weihnachten gefeiert?",
                "How did you celebrate Christmas in the past?",
                Traditions,
            ),
            all(
                "Welches traditionelle Familienrezept möchten Sie weitergeben?",
                "What traditional family recipe would you like to pass on?",
                Traditions,
            ),
            all(
                "Welche Familienrituale sind Ihnen besonders wichtig?",
                "Which family rituals are particularly important to you?",
                Traditions,
            ),
            all(
                "Was ist die wichtigste Lektion, die Sie im Leben gelernt haben?",
                "What is the most important lesson you have learned in life?",
                LifeLessons,
            ),
            all(
                "Welchen Rat würden Sie Ihrem jüngeren Ich geben?",
                "What advice would you give to your younger self?",
                LifeLessons,
            ),
            all(
                "Was macht Sie glücklich?",
                "What makes you happy?",
                LifeLessons,
            ),
            all(
                "Worauf sind Sie in Ihrem Leben am meisten stolz?",
                "What are you most proud of in your life?",
                LifeLessons,
            ),
        ])
    }
}
