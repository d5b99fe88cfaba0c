use anyhow::Result;
use candle_core::{Device, Tensor};
use imitrl_candle_agent::{
    actor_critic::{ActionType, ActorCriticModel, ActorCriticModelConfig},
    adversarial::{AdversarialConfig, AdversarialImitation},
    bc::{Bc, BcConfig},
    dataset::TransitionDataset,
    discriminator::{
        AirlDiscriminator, AirlDiscriminatorConfig, Discriminator, DiscriminatorInput,
        GailDiscriminator, GailDiscriminatorConfig,
    },
    mlp::{Mlp, Mlp2, MlpConfig},
    opt::OptimizerConfig,
    policy::{ActorCritic, StochasticPolicy},
    ppo::{Ppo, PpoConfig},
    rollout::Rollout,
    util::mean_scalar,
};
use imitrl_core::{gae::GaeConfig, AdversarialAlgorithm};

const DIM_OBS: usize = 2;
const N_ACTIONS: usize = 2;
const EPISODE_LEN: usize = 8;

type Agent = ActorCriticModel<Mlp2>;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn agent() -> Result<Agent> {
    let config = ActorCriticModelConfig::default()
        .policy_model_config(MlpConfig::new(DIM_OBS as _, vec![32], N_ACTIONS as _, false))
        .action_type(ActionType::Discrete)
        .opt_config(OptimizerConfig::Adam { lr: 1e-2 });
    Agent::build(config, Device::Cpu)
}

fn observations(n: usize) -> Result<Tensor> {
    Ok(Tensor::randn(0f32, 1.0, (n, DIM_OBS), &Device::Cpu)?)
}

/// The rewarded action is 1 if the first feature is positive, else 0.
fn expert_actions(obs: &Tensor) -> Result<Vec<u32>> {
    let obs: Vec<Vec<f32>> = obs.to_vec2()?;
    Ok(obs.iter().map(|o| (o[0] > 0.0) as u32).collect())
}

fn terminals(n: usize) -> Vec<i8> {
    (0..n).map(|i| ((i + 1) % EPISODE_LEN == 0) as i8).collect()
}

fn collect(agent: &Agent, n: usize) -> Result<Rollout> {
    let obs = observations(n)?;
    let act = agent.sample(&obs, true)?;
    let taken: Vec<u32> = act.to_vec1()?;
    let reward = expert_actions(&obs)?
        .iter()
        .zip(taken.iter())
        .map(|(e, a)| (e == a) as i32 as f32)
        .collect();
    let outputs = agent.evaluate(&obs, &act)?;

    Ok(Rollout {
        obs,
        act,
        reward,
        is_terminated: terminals(n),
        outputs,
    })
}

fn expert_dataset(n: usize) -> Result<TransitionDataset> {
    let obs = observations(n)?;
    let act = Tensor::from_vec(expert_actions(&obs)?, (n,), &Device::Cpu)?;
    TransitionDataset::new(obs, act, vec![1.0; n], terminals(n))
}

fn policy_dataset(agent: &Agent, n: usize) -> Result<TransitionDataset> {
    let rollout = collect(agent, n)?;
    TransitionDataset::new(rollout.obs, rollout.act, rollout.reward, rollout.is_terminated)
}

fn expert_nll(agent: &Agent, obs: &Tensor) -> Result<f32> {
    let act = Tensor::from_vec(expert_actions(obs)?, (obs.dim(0)?,), &Device::Cpu)?;
    mean_scalar(&agent.logp(obs, &act)?.neg()?)
}

#[test]
fn test_ppo_training_loop() -> Result<()> {
    init_logger();
    let mut agent = agent()?;
    let ppo = Ppo::new(PpoConfig::default().entropy_loss_coef(0.01).n_epochs(4))?;
    let gae_config = GaeConfig::default()
        .discount(0.5)
        .trace_decay(0.5)
        .normalize_advantages(true);
    let eval_obs = observations(64)?;

    let before = expert_nll(&agent, &eval_obs)?;
    for _ in 0..20 {
        let batch = collect(&agent, 64)?.into_batch(&gae_config)?;
        let record = ppo.opt(&mut agent, &batch)?;
        assert!(record.get_scalar("loss")?.is_finite());
        assert!(record.get_scalar("grad_norm")?.is_finite());
    }
    let after = expert_nll(&agent, &eval_obs)?;

    assert!(after < before);
    Ok(())
}

#[test]
fn test_behavioral_cloning() -> Result<()> {
    init_logger();
    let mut agent = agent()?;
    let expert = expert_dataset(129)?;
    let mut bc = Bc::new(BcConfig::default().batch_size(32))?;
    let eval_obs = observations(64)?;

    let before = expert_nll(&agent, &eval_obs)?;
    for _ in 0..20 {
        let record = bc.update(&mut agent, &expert)?;
        assert_eq!(record.get_scalar("n_minibatches")?, 4.0);
    }
    let after = expert_nll(&agent, &eval_obs)?;

    assert!(after < before);
    Ok(())
}

#[test]
fn test_gail_discriminator_training() -> Result<()> {
    init_logger();
    let agent = agent()?;
    let expert = expert_dataset(129)?;
    let policy = policy_dataset(&agent, 129)?;

    let config = GailDiscriminatorConfig::default()
        .model_config(MlpConfig::new((DIM_OBS + N_ACTIONS) as _, vec![32], 1, false))
        .opt_config(OptimizerConfig::Adam { lr: 1e-2 })
        .n_discrete_actions(N_ACTIONS);
    let mut disc = GailDiscriminator::<Mlp>::build(config, Device::Cpu)?;
    let mut step = AdversarialImitation::new(AdversarialConfig::default().batch_size(32))?;

    let mut record = step.update(&agent, &mut disc, &expert, &policy)?;
    let first_loss = record.get_scalar("loss_discriminator")?;
    for _ in 0..50 {
        record = step.update(&agent, &mut disc, &expert, &policy)?;
    }

    assert!(record.get_scalar("loss_discriminator")? < first_loss);
    assert!(record.get_scalar("d_expert_mean")? > record.get_scalar("d_policy_mean")?);

    let ixs: Vec<usize> = (0..32).collect();
    let batch = policy.sample(&ixs)?;
    let reward = disc.predict_reward(&DiscriminatorInput::Gail {
        obs: &batch.obs,
        act: &batch.act,
    })?;
    let reward: Vec<f32> = reward.to_vec1()?;
    assert!(reward.iter().all(|r| r.is_finite() && *r >= 0.0));
    Ok(())
}

#[test]
fn test_airl_discriminator_training() -> Result<()> {
    init_logger();
    let agent = agent()?;
    let expert = expert_dataset(65)?;
    let policy = policy_dataset(&agent, 65)?;

    let config = AirlDiscriminatorConfig::default()
        .reward_model_config(MlpConfig::new((DIM_OBS + N_ACTIONS) as _, vec![32], 1, false))
        .shaping_model_config(MlpConfig::new(DIM_OBS as _, vec![32], 1, false))
        .opt_config(OptimizerConfig::Adam { lr: 1e-2 })
        .discount(0.9)
        .n_discrete_actions(N_ACTIONS);
    let mut disc = AirlDiscriminator::<Mlp, Mlp>::build(config, Device::Cpu)?;
    let config = AdversarialConfig::default()
        .algorithm(AdversarialAlgorithm::Airl)
        .batch_size(16);
    let mut step = AdversarialImitation::new(config)?;

    for _ in 0..5 {
        let record = step.update(&agent, &mut disc, &expert, &policy)?;
        assert_eq!(record.get_scalar("n_minibatches")?, 4.0);
        assert_eq!(record.get_string("algorithm")?, "AIRL");
        assert!(record.get_scalar("loss_discriminator")?.is_finite());
    }
    Ok(())
}
