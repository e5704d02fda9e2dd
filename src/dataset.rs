/*!
The example store: the hand-authored SIN examples used to train and to evaluate the model.

Texts and offsets are fixed at authoring time and immutable for the whole run. Offsets are byte
offsets into the text; every sentence here is plain ASCII, so they coincide with character
positions.
*/
use crate::entity::{AnnotatedExample, Entity, SIN_LABEL};

fn example(text: &'static str, spans: &[(usize, usize)]) -> AnnotatedExample<'static> {
    let entities = spans
        .iter()
        .map(|&(start, end)| Entity::new(start, end, SIN_LABEL))
        .collect();
    AnnotatedExample::new(text, entities)
}

/// The training split. Each sentence embeds exactly one SIN, either as nine contiguous digits
/// or as three space-separated groups of three.
pub fn training_examples() -> Vec<AnnotatedExample<'static>> {
    vec![
        example("My SIN number is 123 456 789.", &[(17, 28)]),
        example("My SIN number is 345123890.", &[(17, 26)]),
        example("She said her SIN was 987654321.", &[(21, 30)]),
        example("I found a SIN: 567321456 in the document.", &[(15, 24)]),
        example("Remember to update your 345258111.", &[(24, 33)]),
        example("He noted the number 333 746 210.", &[(20, 31)]),
        example("His SIN, 635 560 310, was incorrect.", &[(9, 20)]),
        example("Can you check the 490 301 319?", &[(18, 29)]),
        example("I lost my wallet with my 865 902 814.", &[(25, 36)]),
        example("Insurance number: 690024836.", &[(18, 27)]),
        example("Here is my new SIN: 107734023.", &[(20, 29)]),
        example("For the record, use 578 823 012.", &[(20, 31)]),
    ]
}

/// The held-out split used for evaluation. Four of the fourteen sentences contain no SIN at
/// all, so that the evaluator is also exercised on examples with an empty gold set.
pub fn evaluation_examples() -> Vec<AnnotatedExample<'static>> {
    vec![
        example("I just received my SIN number, it's 123456789.", &[(36, 45)]),
        example("This is an example sentence without a SIN number.", &[]),
        example("Her SIN, 987654321, was used for the application.", &[(9, 18)]),
        example("No SIN number is mentioned in this particular sentence.", &[]),
        example("Can you verify if 555555555 is a valid SIN?", &[(18, 27)]),
        example(
            "This sentence talks about 222222222 as a possible SIN number.",
            &[(26, 35)],
        ),
        example("Random text here but no Social Insurance Number.", &[]),
        example("Is 444444444 the correct SIN for this account?", &[(3, 12)]),
        example(
            "SIN 777 777 777 was found to be invalid upon checking.",
            &[(4, 15)],
        ),
        example(
            "He mentioned that his SIN, 888888888, needs updating.",
            &[(27, 36)],
        ),
        example(
            "For identification purposes, your SIN 999999999 is required.",
            &[(38, 47)],
        ),
        example(
            "SIN number 000 000 000 was not recognized by the system.",
            &[(11, 22)],
        ),
        example("According to our records, 321321321 is your SIN.", &[(26, 35)]),
        example(
            "This sentence is just a control sentence without numbers or SIN.",
            &[],
        ),
    ]
}
